use common::{ProjectId, UserId};
use thiserror::Error;

/// Errors that can occur when interacting with the link store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No link exists for the (project, user) pair.
    #[error("No link between project {project_id} and user {user_id}")]
    LinkNotFound {
        project_id: ProjectId,
        user_id: UserId,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
