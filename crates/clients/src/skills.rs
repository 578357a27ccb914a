//! Skills service client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::REQUEST_TIMEOUT;
use crate::error::{ClientError, Result};

/// A single skill entry as served by the skills service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    #[serde(rename = "skill_name")]
    pub name: String,
    pub proficiency: String,
}

impl SkillEntry {
    /// Creates a skill entry.
    pub fn new(name: impl Into<String>, proficiency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            proficiency: proficiency.into(),
        }
    }
}

/// Read access to the skills service. Pure read, no side effects.
///
/// The returned order is the service's own contract (lowest id /
/// insertion order) and callers must treat it as fixed.
#[async_trait]
pub trait SkillsClient: Send + Sync {
    /// Fetches the ordered skill entries for a user.
    async fn fetch_skills(&self, user_id: UserId) -> Result<Vec<SkillEntry>>;
}

#[derive(Deserialize)]
struct SkillsEnvelope {
    skills: Vec<SkillEntry>,
}

/// HTTP client for the skills service.
#[derive(Clone)]
pub struct HttpSkillsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSkillsClient {
    /// Creates a client for the skills service at the given base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SkillsClient for HttpSkillsClient {
    async fn fetch_skills(&self, user_id: UserId) -> Result<Vec<SkillEntry>> {
        let url = format!("{}/users/{}/skills", self.base_url, user_id);
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::SkillsNotFound(user_id));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let envelope: SkillsEnvelope = response.json().await?;
        Ok(envelope.skills)
    }
}

/// In-memory skills client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemorySkillsClient {
    state: Arc<RwLock<InMemorySkillsState>>,
}

#[derive(Debug, Default)]
struct InMemorySkillsState {
    skills: HashMap<UserId, Vec<SkillEntry>>,
    unavailable: bool,
}

impl InMemorySkillsClient {
    /// Creates an empty in-memory skills client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the skill list for a user. The given order is preserved.
    pub fn insert(&self, user_id: UserId, skills: Vec<SkillEntry>) {
        self.state.write().unwrap().skills.insert(user_id, skills);
    }

    /// Makes every call fail as a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl SkillsClient for InMemorySkillsClient {
    async fn fetch_skills(&self, user_id: UserId) -> Result<Vec<SkillEntry>> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(ClientError::Unavailable("skills service down".to_string()));
        }
        state
            .skills
            .get(&user_id)
            .cloned()
            .ok_or(ClientError::SkillsNotFound(user_id))
    }
}
