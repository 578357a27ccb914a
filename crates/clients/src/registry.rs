//! External project registry client.
//!
//! The registry is the authoritative record of project membership. The
//! linking saga writes to it before persisting anything locally, and
//! treats the registry's 409 ("already a member") as a successful,
//! idempotent outcome.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::{ProjectId, SkillSnapshot};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Membership writes get a longer deadline than plain reads.
const MEMBER_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload announcing a new project member to the registry.
#[derive(Debug, Clone, Serialize)]
pub struct NewMember {
    pub collaborator_email: String,
    pub contributed_skill_name: String,
    pub contributed_skill_level: String,
}

impl NewMember {
    /// Builds the payload from an email and a skill snapshot.
    pub fn new(email: impl Into<String>, skill: &SkillSnapshot) -> Self {
        Self {
            collaborator_email: email.into(),
            contributed_skill_name: skill.name.clone(),
            contributed_skill_level: skill.level.clone(),
        }
    }
}

/// Registry acknowledgement of a membership write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAck {
    /// The registry recorded the member.
    Created,
    /// The registry already had this member; treated as success.
    AlreadyMember,
}

/// Display data for a project, fetched best-effort for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectInfo {
    #[serde(alias = "name")]
    pub title: String,
}

/// Access to the external project registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Announces a new project member.
    ///
    /// A 404 means the registry has no such project and maps to
    /// [`ClientError::ProjectNotFound`]; any other non-2xx, non-409
    /// response is [`ClientError::RegistryRejected`]; transport failures
    /// are [`ClientError::Unavailable`]. The call is never retried here,
    /// a failure surfaces to the caller.
    async fn add_member(&self, project_id: ProjectId, member: NewMember) -> Result<MembershipAck>;

    /// Fetches a project's display data.
    async fn fetch_project(&self, project_id: ProjectId) -> Result<ProjectInfo>;
}

/// HTTP client for the external registry.
#[derive(Clone)]
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegistryClient {
    /// Creates a client for the registry at the given base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn add_member(&self, project_id: ProjectId, member: NewMember) -> Result<MembershipAck> {
        let url = format!("{}/projects/{}/members", self.base_url, project_id);
        let response = self
            .http
            .post(&url)
            .timeout(MEMBER_TIMEOUT)
            .json(&member)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(MembershipAck::Created);
        }
        if status == reqwest::StatusCode::CONFLICT {
            return Ok(MembershipAck::AlreadyMember);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::ProjectNotFound(project_id));
        }

        let message = response.text().await.unwrap_or_default();
        Err(ClientError::RegistryRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_project(&self, project_id: ProjectId) -> Result<ProjectInfo> {
        let url = format!("{}/projects/{}", self.base_url, project_id);
        let response = self
            .http
            .get(&url)
            .timeout(crate::REQUEST_TIMEOUT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::ProjectNotFound(project_id));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        Ok(response.json().await?)
    }
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    titles: HashMap<ProjectId, String>,
    members: HashMap<ProjectId, Vec<NewMember>>,
    reject_members: bool,
    unavailable: bool,
}

/// In-memory registry for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistryClient {
    state: Arc<RwLock<InMemoryRegistryState>>,
}

impl InMemoryRegistryClient {
    /// Creates an empty in-memory registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project title for enrichment lookups.
    pub fn insert_project(&self, project_id: ProjectId, title: impl Into<String>) {
        self.state
            .write()
            .unwrap()
            .titles
            .insert(project_id, title.into());
    }

    /// Pre-seeds an existing member so the next write acks `AlreadyMember`.
    pub fn seed_member(&self, project_id: ProjectId, email: impl Into<String>) {
        let member = NewMember {
            collaborator_email: email.into(),
            contributed_skill_name: String::new(),
            contributed_skill_level: String::new(),
        };
        self.state
            .write()
            .unwrap()
            .members
            .entry(project_id)
            .or_default()
            .push(member);
    }

    /// Makes membership writes fail with a hard rejection.
    pub fn set_reject_members(&self, reject: bool) {
        self.state.write().unwrap().reject_members = reject;
    }

    /// Makes every call fail as a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Number of members recorded for the project.
    pub fn member_count(&self, project_id: ProjectId) -> usize {
        self.state
            .read()
            .unwrap()
            .members
            .get(&project_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistryClient {
    async fn add_member(&self, project_id: ProjectId, member: NewMember) -> Result<MembershipAck> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(ClientError::Unavailable("registry down".to_string()));
        }
        if state.reject_members {
            return Err(ClientError::RegistryRejected {
                status: 422,
                message: "membership write refused".to_string(),
            });
        }
        if !state.titles.contains_key(&project_id) {
            return Err(ClientError::ProjectNotFound(project_id));
        }

        let members = state.members.entry(project_id).or_default();
        if members
            .iter()
            .any(|m| m.collaborator_email == member.collaborator_email)
        {
            return Ok(MembershipAck::AlreadyMember);
        }
        members.push(member);
        Ok(MembershipAck::Created)
    }

    async fn fetch_project(&self, project_id: ProjectId) -> Result<ProjectInfo> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(ClientError::Unavailable("registry down".to_string()));
        }
        state
            .titles
            .get(&project_id)
            .map(|title| ProjectInfo {
                title: title.clone(),
            })
            .ok_or(ClientError::ProjectNotFound(project_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(email: &str) -> NewMember {
        NewMember::new(email, &SkillSnapshot::new("Go", "advanced"))
    }

    #[tokio::test]
    async fn first_write_is_created() {
        let registry = InMemoryRegistryClient::new();
        registry.insert_project(ProjectId::new(101), "Apollo");
        let ack = registry
            .add_member(ProjectId::new(101), member("ana@x.com"))
            .await
            .unwrap();
        assert_eq!(ack, MembershipAck::Created);
        assert_eq!(registry.member_count(ProjectId::new(101)), 1);
    }

    #[tokio::test]
    async fn duplicate_write_acks_already_member() {
        let registry = InMemoryRegistryClient::new();
        let project = ProjectId::new(101);
        registry.insert_project(project, "Apollo");

        registry.add_member(project, member("ana@x.com")).await.unwrap();
        let ack = registry.add_member(project, member("ana@x.com")).await.unwrap();

        assert_eq!(ack, MembershipAck::AlreadyMember);
        assert_eq!(registry.member_count(project), 1);
    }

    #[tokio::test]
    async fn rejection_is_a_hard_failure() {
        let registry = InMemoryRegistryClient::new();
        registry.set_reject_members(true);

        let result = registry.add_member(ProjectId::new(101), member("ana@x.com")).await;
        assert!(matches!(
            result,
            Err(ClientError::RegistryRejected { status: 422, .. })
        ));
        assert_eq!(registry.member_count(ProjectId::new(101)), 0);
    }

    #[tokio::test]
    async fn membership_write_to_unknown_project_is_not_found() {
        let registry = InMemoryRegistryClient::new();

        let result = registry.add_member(ProjectId::new(999), member("ana@x.com")).await;
        assert!(matches!(result, Err(ClientError::ProjectNotFound(_))));
        assert_eq!(registry.member_count(ProjectId::new(999)), 0);
    }

    #[tokio::test]
    async fn project_title_lookup() {
        let registry = InMemoryRegistryClient::new();
        registry.insert_project(ProjectId::new(101), "Apollo");

        let info = registry.fetch_project(ProjectId::new(101)).await.unwrap();
        assert_eq!(info.title, "Apollo");

        let missing = registry.fetch_project(ProjectId::new(999)).await;
        assert!(matches!(missing, Err(ClientError::ProjectNotFound(_))));
    }

    #[test]
    fn project_info_accepts_title_or_name() {
        let with_title: ProjectInfo = serde_json::from_str(r#"{"title":"Apollo"}"#).unwrap();
        assert_eq!(with_title.title, "Apollo");

        let with_name: ProjectInfo = serde_json::from_str(r#"{"name":"Apollo"}"#).unwrap();
        assert_eq!(with_name.title, "Apollo");
    }
}
