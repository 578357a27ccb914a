//! Client error taxonomy.

use common::{ProjectId, UserId};
use thiserror::Error;

/// Errors returned by the downstream service clients.
///
/// Not-found conditions are named per service so callers can surface
/// them distinctly; transport failures and timeouts collapse into
/// [`ClientError::Unavailable`] and are never conflated with not-found.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The profile service has no profile for the user.
    #[error("Profile not found for user {0}")]
    ProfileNotFound(UserId),

    /// The skills service has no skill list for the user.
    #[error("Skills not found for user {0}")]
    SkillsNotFound(UserId),

    /// The identity service has no record for the given id or email.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The registry has no project with the given id.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The registry refused the membership write with a non-idempotent
    /// failure response (anything other than 2xx or 409).
    #[error("Registry rejected the request with status {status}: {message}")]
    RegistryRejected { status: u16, message: String },

    /// A transport failure or timeout reaching the service.
    #[error("Dependency unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a body the client could not decode.
    #[error("Malformed response from dependency: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Unavailable(err.to_string())
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
