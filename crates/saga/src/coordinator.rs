//! Coordinator for the collaborator linking saga.

use clients::{
    CollaboratorAggregator, IdentityClient, MembershipAck, NewMember, ProfileClient,
    RegistryClient, SkillsClient,
};
use common::{ProjectId, UserId};
use link_store::LinkStore;
use serde::Serialize;

use crate::error::{LinkError, Result};
use crate::state::LinkPhase;

/// Result of a successful linking request.
#[derive(Debug, Clone, Serialize)]
pub struct LinkResult {
    pub link_id: i64,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub skill_name: String,
    pub skill_level: String,
}

/// Orchestrates linking and unlinking of collaborators.
///
/// Drives the single-pass saga: collaborator data, identity, local
/// duplicate check, registry notification, local persistence. The local
/// duplicate check avoids a redundant registry call, but correctness
/// rests on the store's idempotent insert and on the registry treating a
/// repeated member as a 409, which this coordinator absorbs as success.
pub struct LinkCoordinator<P, S, I, R, L>
where
    P: ProfileClient,
    S: SkillsClient,
    I: IdentityClient,
    R: RegistryClient,
    L: LinkStore,
{
    aggregator: CollaboratorAggregator<P, S>,
    identity: I,
    registry: R,
    store: L,
}

impl<P, S, I, R, L> LinkCoordinator<P, S, I, R, L>
where
    P: ProfileClient,
    S: SkillsClient,
    I: IdentityClient,
    R: RegistryClient,
    L: LinkStore,
{
    /// Creates a new coordinator over the given clients and store.
    pub fn new(profile: P, skills: S, identity: I, registry: R, store: L) -> Self {
        Self {
            aggregator: CollaboratorAggregator::new(profile, skills),
            identity,
            registry,
            store,
        }
    }

    /// Links a collaborator to a project.
    #[tracing::instrument(skip(self))]
    pub async fn link(&self, project_id: ProjectId, user_id: UserId) -> Result<LinkResult> {
        metrics::counter!("link_saga_total").increment(1);
        let saga_start = std::time::Instant::now();

        let result = self.run_link(project_id, user_id).await;

        metrics::histogram!("link_saga_duration_seconds")
            .record(saga_start.elapsed().as_secs_f64());
        match &result {
            Ok(link) => {
                metrics::counter!("link_saga_completed").increment(1);
                tracing::info!(link_id = link.link_id, phase = %LinkPhase::Done, "collaborator linked");
            }
            Err(e) => {
                metrics::counter!("link_saga_failed").increment(1);
                tracing::warn!(%project_id, %user_id, error = %e, phase = %LinkPhase::Failed, "linking saga failed");
            }
        }
        result
    }

    async fn run_link(&self, project_id: ProjectId, user_id: UserId) -> Result<LinkResult> {
        if !project_id.is_valid() || !user_id.is_valid() {
            return Err(LinkError::InvalidInput(
                "project_id and user_id must be positive".to_string(),
            ));
        }

        // 1. Gather profile and skills; take the snapshot
        tracing::debug!(phase = %LinkPhase::FetchingCollaboratorData, "saga step");
        let collaborator = self.aggregator.fetch_collaborator(user_id).await?;
        let skill = collaborator.skill_snapshot();

        // 2. Resolve the canonical email
        tracing::debug!(phase = %LinkPhase::FetchingIdentity, "saga step");
        let identity = self.identity.fetch_user(user_id).await?;

        // 3. Local duplicate check, before any remote write
        tracing::debug!(phase = %LinkPhase::CheckingLocalDuplicate, "saga step");
        if self.store.find(project_id, user_id).await?.is_some() {
            return Err(LinkError::AlreadyLinked {
                project_id,
                user_id,
            });
        }

        // 4. Notify the authoritative registry; 409 is success
        tracing::debug!(phase = %LinkPhase::NotifyingRegistry, "saga step");
        let ack = self
            .registry
            .add_member(project_id, NewMember::new(identity.email, &skill))
            .await?;
        if ack == MembershipAck::AlreadyMember {
            tracing::info!(%project_id, %user_id, "registry already had this member");
        }

        // 5. Persist the mirror. A concurrent request may have inserted
        //    the same key since step 3; the idempotent insert absorbs it.
        tracing::debug!(phase = %LinkPhase::PersistingLocal, "saga step");
        let outcome = self
            .store
            .insert_if_absent(project_id, user_id, &skill)
            .await?;
        let record = outcome.record();

        Ok(LinkResult {
            link_id: record.id,
            project_id: record.project_id,
            user_id: record.user_id,
            skill_name: record.skill_name.clone(),
            skill_level: record.skill_level.clone(),
        })
    }

    /// Removes the local link for a (project, user) pair.
    ///
    /// The registry is not informed: membership changes made there stay
    /// authoritative and no reconciliation is attempted.
    #[tracing::instrument(skip(self))]
    pub async fn unlink(&self, project_id: ProjectId, user_id: UserId) -> Result<()> {
        if !project_id.is_valid() || !user_id.is_valid() {
            return Err(LinkError::InvalidInput(
                "project_id and user_id must be positive".to_string(),
            ));
        }

        self.store.delete(project_id, user_id).await?;
        tracing::info!(%project_id, %user_id, "collaborator unlinked");
        Ok(())
    }

    /// Read access to the underlying link store.
    pub fn store(&self) -> &L {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clients::{
        InMemoryIdentityClient, InMemoryProfileClient, InMemoryRegistryClient,
        InMemorySkillsClient, ProfileSummary, SkillEntry,
    };
    use link_store::InMemoryLinkStore;

    type TestCoordinator = LinkCoordinator<
        InMemoryProfileClient,
        InMemorySkillsClient,
        InMemoryIdentityClient,
        InMemoryRegistryClient,
        InMemoryLinkStore,
    >;

    struct Harness {
        coordinator: TestCoordinator,
        profile: InMemoryProfileClient,
        skills: InMemorySkillsClient,
        identity: InMemoryIdentityClient,
        registry: InMemoryRegistryClient,
        store: InMemoryLinkStore,
    }

    impl Harness {
        fn new() -> Self {
            let profile = InMemoryProfileClient::new();
            let skills = InMemorySkillsClient::new();
            let identity = InMemoryIdentityClient::new();
            let registry = InMemoryRegistryClient::new();
            let store = InMemoryLinkStore::new();

            let coordinator = LinkCoordinator::new(
                profile.clone(),
                skills.clone(),
                identity.clone(),
                registry.clone(),
                store.clone(),
            );

            Self {
                coordinator,
                profile,
                skills,
                identity,
                registry,
                store,
            }
        }

        /// Seeds user 7 ("Ana") across all three read services, and
        /// project 101 in the registry.
        fn seed_ana(&self) {
            self.registry.insert_project(ProjectId::new(101), "Apollo");
            self.profile.insert(
                UserId::new(7),
                ProfileSummary {
                    full_name: "Ana".to_string(),
                    bio: None,
                    availability: Some("exploring".to_string()),
                },
            );
            self.skills
                .insert(UserId::new(7), vec![SkillEntry::new("Go", "advanced")]);
            self.identity.insert(UserId::new(7), "ana@x.com");
        }
    }

    #[tokio::test]
    async fn happy_path_links_and_mirrors() {
        let h = Harness::new();
        h.seed_ana();

        let result = h
            .coordinator
            .link(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();

        assert_eq!(result.project_id, ProjectId::new(101));
        assert_eq!(result.user_id, UserId::new(7));
        assert_eq!(result.skill_name, "Go");
        assert_eq!(result.skill_level, "advanced");

        assert_eq!(h.registry.member_count(ProjectId::new(101)), 1);
        let record = h
            .store
            .find(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, result.link_id);
    }

    #[tokio::test]
    async fn second_link_is_a_conflict_without_renotifying() {
        let h = Harness::new();
        h.seed_ana();

        h.coordinator
            .link(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();

        let second = h.coordinator.link(ProjectId::new(101), UserId::new(7)).await;
        assert!(matches!(second, Err(LinkError::AlreadyLinked { .. })));

        // The short-circuit fired before the registry call
        assert_eq!(h.registry.member_count(ProjectId::new(101)), 1);
        assert_eq!(h.store.row_count().await, 1);
    }

    #[tokio::test]
    async fn registry_already_member_still_persists_locally() {
        let h = Harness::new();
        h.seed_ana();
        h.registry.seed_member(ProjectId::new(101), "ana@x.com");

        let result = h
            .coordinator
            .link(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();

        assert_eq!(result.skill_name, "Go");
        assert_eq!(h.store.row_count().await, 1);
    }

    #[tokio::test]
    async fn empty_skills_use_fallback_snapshot() {
        let h = Harness::new();
        h.seed_ana();
        h.skills.insert(UserId::new(7), vec![]);

        let result = h
            .coordinator
            .link(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();

        assert_eq!(result.skill_name, "general");
        assert_eq!(result.skill_level, "basic");
    }

    #[tokio::test]
    async fn missing_profile_aborts_before_any_write() {
        let h = Harness::new();
        h.identity.insert(UserId::new(7), "ana@x.com");

        let result = h.coordinator.link(ProjectId::new(101), UserId::new(7)).await;
        assert!(matches!(result, Err(LinkError::ProfileNotFound(_))));

        assert_eq!(h.registry.member_count(ProjectId::new(101)), 0);
        assert_eq!(h.store.row_count().await, 0);
    }

    #[tokio::test]
    async fn missing_skills_reported_distinctly() {
        let h = Harness::new();
        h.seed_ana();
        // Replace the skills client state with nothing for user 8
        h.profile.insert(
            UserId::new(8),
            ProfileSummary {
                full_name: "Bruno".to_string(),
                bio: None,
                availability: None,
            },
        );
        h.identity.insert(UserId::new(8), "bruno@x.com");

        let result = h.coordinator.link(ProjectId::new(101), UserId::new(8)).await;
        assert!(matches!(result, Err(LinkError::SkillsNotFound(_))));
    }

    #[tokio::test]
    async fn missing_identity_aborts_before_registry() {
        let h = Harness::new();
        h.profile.insert(
            UserId::new(9),
            ProfileSummary {
                full_name: "Caio".to_string(),
                bio: None,
                availability: None,
            },
        );
        h.skills
            .insert(UserId::new(9), vec![SkillEntry::new("SQL", "basic")]);

        let result = h.coordinator.link(ProjectId::new(101), UserId::new(9)).await;
        assert!(matches!(result, Err(LinkError::IdentityNotFound(_))));
        assert_eq!(h.registry.member_count(ProjectId::new(101)), 0);
    }

    #[tokio::test]
    async fn unknown_project_aborts_without_local_row() {
        let h = Harness::new();
        h.seed_ana();

        let result = h.coordinator.link(ProjectId::new(999), UserId::new(7)).await;
        assert!(matches!(result, Err(LinkError::ProjectNotFound(_))));

        assert_eq!(h.registry.member_count(ProjectId::new(999)), 0);
        assert_eq!(h.store.row_count().await, 0);
    }

    #[tokio::test]
    async fn registry_rejection_leaves_no_local_row() {
        let h = Harness::new();
        h.seed_ana();
        h.registry.set_reject_members(true);

        let result = h.coordinator.link(ProjectId::new(101), UserId::new(7)).await;
        assert!(matches!(result, Err(LinkError::RegistryRejected { .. })));
        assert_eq!(h.store.row_count().await, 0);
    }

    #[tokio::test]
    async fn registry_outage_is_dependency_unavailable() {
        let h = Harness::new();
        h.seed_ana();
        h.registry.set_unavailable(true);

        let result = h.coordinator.link(ProjectId::new(101), UserId::new(7)).await;
        assert!(matches!(result, Err(LinkError::DependencyUnavailable(_))));
        assert_eq!(h.store.row_count().await, 0);
    }

    #[tokio::test]
    async fn non_positive_ids_are_invalid_input() {
        let h = Harness::new();

        let result = h.coordinator.link(ProjectId::new(0), UserId::new(7)).await;
        assert!(matches!(result, Err(LinkError::InvalidInput(_))));

        let result = h.coordinator.link(ProjectId::new(101), UserId::new(-1)).await;
        assert!(matches!(result, Err(LinkError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unlink_then_relink_takes_a_fresh_snapshot() {
        let h = Harness::new();
        h.seed_ana();

        let first = h
            .coordinator
            .link(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();
        assert_eq!(first.skill_name, "Go");

        h.coordinator
            .unlink(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();

        // Skill list changed between unlink and relink
        h.skills
            .insert(UserId::new(7), vec![SkillEntry::new("Rust", "expert")]);

        let second = h
            .coordinator
            .link(ProjectId::new(101), UserId::new(7))
            .await
            .unwrap();

        assert_ne!(second.link_id, first.link_id);
        assert_eq!(second.skill_name, "Rust");
        assert_eq!(h.store.row_count().await, 1);
    }

    #[tokio::test]
    async fn unlink_without_link_is_not_found() {
        let h = Harness::new();
        let result = h.coordinator.unlink(ProjectId::new(101), UserId::new(7)).await;
        assert!(matches!(result, Err(LinkError::LinkNotFound { .. })));
    }

    #[tokio::test]
    async fn concurrent_links_converge_to_one_row() {
        let h = Harness::new();
        h.seed_ana();

        let c1 = &h.coordinator;
        let c2 = &h.coordinator;
        let (a, b) = tokio::join!(
            c1.link(ProjectId::new(101), UserId::new(7)),
            c2.link(ProjectId::new(101), UserId::new(7)),
        );

        // One of the two wins outright; the other either hits the local
        // duplicate check or is absorbed by the idempotent insert.
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert!(successes >= 1);
        assert_eq!(h.store.row_count().await, 1);
    }
}
