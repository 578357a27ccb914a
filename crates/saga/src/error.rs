//! Linking saga error types.

use clients::ClientError;
use common::{ProjectId, UserId};
use link_store::StoreError;
use thiserror::Error;

/// Errors that can abort a linking or unlinking request.
///
/// Every downstream failure in the write path surfaces here typed; the
/// saga never downgrades a hard failure.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The profile service has no profile for the user.
    #[error("Profile not found for user {0}")]
    ProfileNotFound(UserId),

    /// The skills service has no skill list for the user.
    #[error("Skills not found for user {0}")]
    SkillsNotFound(UserId),

    /// The identity service has no record for the user.
    #[error("User not found in identity service: {0}")]
    IdentityNotFound(String),

    /// The registry has no project with the given id.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// A local link already exists for the (project, user) pair.
    #[error("User {user_id} is already linked to project {project_id}")]
    AlreadyLinked {
        project_id: ProjectId,
        user_id: UserId,
    },

    /// No local link exists for the (project, user) pair.
    #[error("No link between project {project_id} and user {user_id}")]
    LinkNotFound {
        project_id: ProjectId,
        user_id: UserId,
    },

    /// The registry refused the membership write with a hard failure.
    #[error("Registry rejected the membership write with status {status}: {message}")]
    RegistryRejected { status: u16, message: String },

    /// A transport failure or timeout to any downstream dependency.
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Malformed identifiers in the request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Link store failure.
    #[error("Link store error: {0}")]
    Store(StoreError),
}

impl From<ClientError> for LinkError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ProfileNotFound(user_id) => LinkError::ProfileNotFound(user_id),
            ClientError::SkillsNotFound(user_id) => LinkError::SkillsNotFound(user_id),
            ClientError::UserNotFound(subject) => LinkError::IdentityNotFound(subject),
            ClientError::ProjectNotFound(project_id) => LinkError::ProjectNotFound(project_id),
            ClientError::RegistryRejected { status, message } => {
                LinkError::RegistryRejected { status, message }
            }
            ClientError::Unavailable(reason) => LinkError::DependencyUnavailable(reason),
            ClientError::MalformedResponse(reason) => LinkError::DependencyUnavailable(reason),
        }
    }
}

impl From<StoreError> for LinkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LinkNotFound {
                project_id,
                user_id,
            } => LinkError::LinkNotFound {
                project_id,
                user_id,
            },
            other => LinkError::Store(other),
        }
    }
}

/// Result type for saga operations.
pub type Result<T> = std::result::Result<T, LinkError>;
