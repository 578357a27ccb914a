use link_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the query side.
///
/// Per-item enrichment failures never appear here; they degrade to
/// placeholder data inside the result set instead.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The searched collaborator does not exist.
    #[error("Collaborator not found: {0}")]
    NotFound(String),

    /// Malformed identifiers in the request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The identity roster itself could not be fetched.
    #[error("Dependency unavailable: {0}")]
    Unavailable(String),

    /// Link store failure.
    #[error("Link store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
