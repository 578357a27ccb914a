//! Identity service client.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::REQUEST_TIMEOUT;
use crate::error::{ClientError, Result};

/// Canonical identity record for a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: UserId,
    pub email: String,
}

/// Read access to the identity service.
///
/// Records are resolved per call; nothing is cached.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Fetches the identity record for a user id.
    async fn fetch_user(&self, user_id: UserId) -> Result<IdentityRecord>;

    /// Fetches the identity record for an email address.
    async fn fetch_user_by_email(&self, email: &str) -> Result<IdentityRecord>;

    /// Fetches one page of the full user roster.
    async fn fetch_roster(&self, page: u32, page_size: u32) -> Result<Vec<IdentityRecord>>;
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: IdentityRecord,
}

#[derive(Deserialize)]
struct RosterEnvelope {
    users: Vec<IdentityRecord>,
}

/// HTTP client for the identity service.
#[derive(Clone)]
pub struct HttpIdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    /// Creates a client for the identity service at the given base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch_one(&self, url: String, subject: String) -> Result<IdentityRecord> {
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::UserNotFound(subject));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let envelope: UserEnvelope = response.json().await?;
        Ok(envelope.user)
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn fetch_user(&self, user_id: UserId) -> Result<IdentityRecord> {
        let url = format!("{}/users/{}", self.base_url, user_id);
        self.fetch_one(url, user_id.to_string()).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<IdentityRecord> {
        let url = format!("{}/users/by-email/{}", self.base_url, email);
        self.fetch_one(url, email.to_string()).await
    }

    async fn fetch_roster(&self, page: u32, page_size: u32) -> Result<Vec<IdentityRecord>> {
        let url = format!(
            "{}/users?page={}&per_page={}",
            self.base_url, page, page_size
        );
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let envelope: RosterEnvelope = response.json().await?;
        Ok(envelope.users)
    }
}

/// In-memory identity client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityClient {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    users: Vec<IdentityRecord>,
    unavailable: bool,
}

impl InMemoryIdentityClient {
    /// Creates an empty in-memory identity client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user in the roster.
    pub fn insert(&self, user_id: UserId, email: impl Into<String>) {
        self.state.write().unwrap().users.push(IdentityRecord {
            id: user_id,
            email: email.into(),
        });
    }

    /// Makes every call fail as a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    fn check_available(state: &InMemoryIdentityState) -> Result<()> {
        if state.unavailable {
            return Err(ClientError::Unavailable(
                "identity service down".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityClient for InMemoryIdentityClient {
    async fn fetch_user(&self, user_id: UserId) -> Result<IdentityRecord> {
        let state = self.state.read().unwrap();
        Self::check_available(&state)?;
        state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| ClientError::UserNotFound(user_id.to_string()))
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<IdentityRecord> {
        let state = self.state.read().unwrap();
        Self::check_available(&state)?;
        state
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| ClientError::UserNotFound(email.to_string()))
    }

    async fn fetch_roster(&self, page: u32, page_size: u32) -> Result<Vec<IdentityRecord>> {
        let state = self.state.read().unwrap();
        Self::check_available(&state)?;
        let offset = (page.saturating_sub(1) as usize) * page_size as usize;
        Ok(state
            .users
            .iter()
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_by_id_and_email() {
        let client = InMemoryIdentityClient::new();
        client.insert(UserId::new(7), "ana@x.com");

        let by_id = client.fetch_user(UserId::new(7)).await.unwrap();
        assert_eq!(by_id.email, "ana@x.com");

        let by_email = client.fetch_user_by_email("ana@x.com").await.unwrap();
        assert_eq!(by_email.id, UserId::new(7));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let client = InMemoryIdentityClient::new();
        let result = client.fetch_user(UserId::new(42)).await;
        assert!(matches!(result, Err(ClientError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn roster_pages_do_not_overlap() {
        let client = InMemoryIdentityClient::new();
        for i in 1..=5 {
            client.insert(UserId::new(i), format!("user{i}@x.com"));
        }

        let page1 = client.fetch_roster(1, 2).await.unwrap();
        let page2 = client.fetch_roster(2, 2).await.unwrap();
        let page3 = client.fetch_roster(3, 2).await.unwrap();

        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);
        assert_eq!(page3.len(), 1);
        assert_ne!(page1[0].id, page2[0].id);
    }

    #[tokio::test]
    async fn outage_surfaces_as_unavailable() {
        let client = InMemoryIdentityClient::new();
        client.insert(UserId::new(7), "ana@x.com");
        client.set_unavailable(true);

        let result = client.fetch_user(UserId::new(7)).await;
        assert!(matches!(result, Err(ClientError::Unavailable(_))));
    }
}
