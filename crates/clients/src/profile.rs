//! Profile service client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::REQUEST_TIMEOUT;
use crate::error::{ClientError, Result};

/// Summary of a collaborator's profile as served by the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub full_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

/// Read access to the profile service. Pure read, no side effects.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Fetches the profile summary for a user.
    ///
    /// A 404 from the service maps to [`ClientError::ProfileNotFound`];
    /// transport failures map to [`ClientError::Unavailable`].
    async fn fetch_profile(&self, user_id: UserId) -> Result<ProfileSummary>;
}

/// Envelope the profile service wraps its payload in.
#[derive(Deserialize)]
struct ProfileEnvelope {
    profile: ProfileSummary,
}

/// HTTP client for the profile service.
#[derive(Clone)]
pub struct HttpProfileClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProfileClient {
    /// Creates a client for the profile service at the given base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProfileClient for HttpProfileClient {
    async fn fetch_profile(&self, user_id: UserId) -> Result<ProfileSummary> {
        let url = format!("{}/profiles/{}", self.base_url, user_id);
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::ProfileNotFound(user_id));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let envelope: ProfileEnvelope = response.json().await?;
        Ok(envelope.profile)
    }
}

/// In-memory profile client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileClient {
    state: Arc<RwLock<InMemoryProfileState>>,
}

#[derive(Debug, Default)]
struct InMemoryProfileState {
    profiles: HashMap<UserId, ProfileSummary>,
    unavailable: bool,
}

impl InMemoryProfileClient {
    /// Creates an empty in-memory profile client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile for a user.
    pub fn insert(&self, user_id: UserId, profile: ProfileSummary) {
        self.state.write().unwrap().profiles.insert(user_id, profile);
    }

    /// Makes every call fail as a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl ProfileClient for InMemoryProfileClient {
    async fn fetch_profile(&self, user_id: UserId) -> Result<ProfileSummary> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(ClientError::Unavailable("profile service down".to_string()));
        }
        state
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or(ClientError::ProfileNotFound(user_id))
    }
}
