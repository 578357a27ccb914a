//! Integration tests for the collaborator linking saga.

use clients::{
    InMemoryIdentityClient, InMemoryProfileClient, InMemoryRegistryClient, InMemorySkillsClient,
    ProfileSummary, SkillEntry,
};
use common::{ProjectId, UserId};
use link_store::{InMemoryLinkStore, LinkStore};
use saga::{LinkCoordinator, LinkError};

type TestCoordinator = LinkCoordinator<
    InMemoryProfileClient,
    InMemorySkillsClient,
    InMemoryIdentityClient,
    InMemoryRegistryClient,
    InMemoryLinkStore,
>;

struct TestHarness {
    coordinator: TestCoordinator,
    skills: InMemorySkillsClient,
    registry: InMemoryRegistryClient,
    store: InMemoryLinkStore,
}

impl TestHarness {
    fn new() -> Self {
        let profile = InMemoryProfileClient::new();
        let skills = InMemorySkillsClient::new();
        let identity = InMemoryIdentityClient::new();
        let registry = InMemoryRegistryClient::new();
        let store = InMemoryLinkStore::new();

        // User 7: profile {full_name: "Ana"}, skills [Go/advanced],
        // email ana@x.com
        profile.insert(
            UserId::new(7),
            ProfileSummary {
                full_name: "Ana".to_string(),
                bio: None,
                availability: Some("exploring".to_string()),
            },
        );
        skills.insert(UserId::new(7), vec![SkillEntry::new("Go", "advanced")]);
        identity.insert(UserId::new(7), "ana@x.com");

        registry.insert_project(ProjectId::new(101), "Apollo");
        registry.insert_project(ProjectId::new(102), "Zephyr");

        let coordinator = LinkCoordinator::new(
            profile,
            skills.clone(),
            identity,
            registry.clone(),
            store.clone(),
        );

        Self {
            coordinator,
            skills,
            registry,
            store,
        }
    }
}

#[tokio::test]
async fn ana_scenario_end_to_end() {
    let h = TestHarness::new();
    let project = ProjectId::new(101);
    let user = UserId::new(7);

    // First link succeeds and mirrors the skill snapshot
    let result = h.coordinator.link(project, user).await.unwrap();
    assert_eq!(result.project_id, project);
    assert_eq!(result.user_id, user);
    assert_eq!(result.skill_name, "Go");
    assert_eq!(result.skill_level, "advanced");
    assert_eq!(h.registry.member_count(project), 1);

    let first_row = h.store.find(project, user).await.unwrap().unwrap();

    // Second call reports a conflict, no duplicate row
    let second = h.coordinator.link(project, user).await;
    assert!(matches!(second, Err(LinkError::AlreadyLinked { .. })));
    assert_eq!(h.store.row_count().await, 1);

    // Unlink then relink produces a new row with a later timestamp
    h.coordinator.unlink(project, user).await.unwrap();
    let relinked = h.coordinator.link(project, user).await.unwrap();
    assert_ne!(relinked.link_id, first_row.id);

    let second_row = h.store.find(project, user).await.unwrap().unwrap();
    assert!(second_row.created_at >= first_row.created_at);
    assert!(second_row.id > first_row.id);
}

#[tokio::test]
async fn snapshot_is_refetched_on_relink() {
    let h = TestHarness::new();
    let project = ProjectId::new(101);
    let user = UserId::new(7);

    h.coordinator.link(project, user).await.unwrap();
    h.coordinator.unlink(project, user).await.unwrap();

    h.skills.insert(
        user,
        vec![
            SkillEntry::new("Kubernetes", "intermediate"),
            SkillEntry::new("Go", "advanced"),
        ],
    );

    let relinked = h.coordinator.link(project, user).await.unwrap();
    assert_eq!(relinked.skill_name, "Kubernetes");
    assert_eq!(relinked.skill_level, "intermediate");
}

#[tokio::test]
async fn registry_idempotency_is_absorbed() {
    let h = TestHarness::new();
    let project = ProjectId::new(101);

    // The registry already knows this member through another channel
    h.registry.seed_member(project, "ana@x.com");

    let result = h.coordinator.link(project, UserId::new(7)).await.unwrap();
    assert_eq!(result.skill_name, "Go");
    assert_eq!(h.store.row_count().await, 1);
}

#[tokio::test]
async fn uniqueness_holds_across_many_attempts() {
    let h = TestHarness::new();
    let project = ProjectId::new(101);
    let user = UserId::new(7);

    for _ in 0..5 {
        let _ = h.coordinator.link(project, user).await;
    }

    assert_eq!(h.store.row_count().await, 1);
    let metrics = h.store.metrics().await.unwrap();
    assert_eq!(metrics.total_links, 1);
    assert_eq!(metrics.unique_projects, 1);
    assert_eq!(metrics.unique_collaborators, 1);
}

#[tokio::test]
async fn same_user_can_join_multiple_projects() {
    let h = TestHarness::new();
    let user = UserId::new(7);

    h.coordinator.link(ProjectId::new(101), user).await.unwrap();
    h.coordinator.link(ProjectId::new(102), user).await.unwrap();

    let metrics = h.store.metrics().await.unwrap();
    assert_eq!(metrics.total_links, 2);
    assert_eq!(metrics.unique_projects, 2);
    assert_eq!(metrics.unique_collaborators, 1);
}
