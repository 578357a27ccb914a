//! Query service over the link mirror and the collaborator services.

use clients::{ClientError, IdentityClient, ProfileClient, RegistryClient, SkillsClient};
use common::{ProjectId, UserId};
use link_store::{LinkMetrics, LinkRecord, LinkStore};

use crate::error::{QueryError, Result};
use crate::types::{
    CollaboratorPage, CollaboratorView, EnrichedLink, PageRequest, SearchKey, placeholder_title,
};

/// Read-side service: listings, enrichment, directory fan-out, search.
pub struct QueryService<P, S, I, R, L>
where
    P: ProfileClient,
    S: SkillsClient,
    I: IdentityClient,
    R: RegistryClient,
    L: LinkStore,
{
    profile: P,
    skills: S,
    identity: I,
    registry: R,
    store: L,
}

impl<P, S, I, R, L> QueryService<P, S, I, R, L>
where
    P: ProfileClient,
    S: SkillsClient,
    I: IdentityClient,
    R: RegistryClient,
    L: LinkStore,
{
    /// Creates a query service over the given clients and store.
    pub fn new(profile: P, skills: S, identity: I, registry: R, store: L) -> Self {
        Self {
            profile,
            skills,
            identity,
            registry,
            store,
        }
    }

    /// Lists a project's collaborators, newest first.
    ///
    /// The skill snapshot is already denormalized on the row, so no
    /// enrichment is needed.
    #[tracing::instrument(skip(self))]
    pub async fn list_project_collaborators(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<LinkRecord>> {
        if !project_id.is_valid() {
            return Err(QueryError::InvalidInput(
                "project_id must be positive".to_string(),
            ));
        }
        Ok(self.store.list_by_project(project_id).await?)
    }

    /// Lists a user's projects with best-effort display titles.
    ///
    /// A failed or missing title lookup degrades that entry to the
    /// placeholder title; other entries are unaffected.
    #[tracing::instrument(skip(self))]
    pub async fn list_user_projects(&self, user_id: UserId) -> Result<Vec<EnrichedLink>> {
        if !user_id.is_valid() {
            return Err(QueryError::InvalidInput(
                "user_id must be positive".to_string(),
            ));
        }

        let rows = self.store.list_by_user(user_id).await?;

        let mut enriched = Vec::with_capacity(rows.len());
        for row in rows {
            let title = match self.registry.fetch_project(row.project_id).await {
                Ok(info) => info.title,
                Err(e) => {
                    tracing::debug!(project_id = %row.project_id, error = %e, "title lookup degraded to placeholder");
                    placeholder_title(row.project_id)
                }
            };
            enriched.push(EnrichedLink {
                link_id: row.id,
                project_id: row.project_id,
                project_title: title,
                skill_name: row.skill_name,
                skill_level: row.skill_level,
                created_at: row.created_at,
            });
        }
        Ok(enriched)
    }

    /// Resolves one collaborator by id or email and aggregates their
    /// profile and skills, tolerating either sub-fetch failing.
    #[tracing::instrument(skip(self))]
    pub async fn search_collaborator(&self, key: SearchKey) -> Result<CollaboratorView> {
        let identity = match &key {
            SearchKey::Id(user_id) => {
                if !user_id.is_valid() {
                    return Err(QueryError::InvalidInput(
                        "user_id must be positive".to_string(),
                    ));
                }
                self.identity.fetch_user(*user_id).await
            }
            SearchKey::Email(email) => self.identity.fetch_user_by_email(email).await,
        };

        let identity = identity.map_err(|e| match e {
            ClientError::UserNotFound(subject) => QueryError::NotFound(subject),
            other => QueryError::Unavailable(other.to_string()),
        })?;

        Ok(self.build_view(identity.id, identity.email).await)
    }

    /// Pages through the identity roster and aggregates each user.
    ///
    /// Per-user fetch failures degrade that entry to partial data; only
    /// a failure of the roster fetch itself fails the page.
    #[tracing::instrument(skip(self))]
    pub async fn list_collaborators(&self, page: PageRequest) -> Result<CollaboratorPage> {
        let roster = self
            .identity
            .fetch_roster(page.page, page.page_size)
            .await
            .map_err(|e| QueryError::Unavailable(e.to_string()))?;

        let mut collaborators = Vec::with_capacity(roster.len());
        for user in roster {
            collaborators.push(self.build_view(user.id, user.email).await);
        }

        Ok(CollaboratorPage {
            page: page.page,
            page_size: page.page_size,
            collaborators,
        })
    }

    /// Aggregate counts over the link mirror.
    #[tracing::instrument(skip(self))]
    pub async fn link_metrics(&self) -> Result<LinkMetrics> {
        Ok(self.store.metrics().await?)
    }

    async fn build_view(&self, user_id: UserId, email: String) -> CollaboratorView {
        let profile = self.profile.fetch_profile(user_id).await.ok();
        let skills = self.skills.fetch_skills(user_id).await.ok();

        let (full_name, availability) = profile
            .map(|p| (Some(p.full_name), p.availability))
            .unwrap_or((None, None));

        CollaboratorView {
            user_id,
            email,
            full_name,
            availability,
            skills,
        }
    }
}
