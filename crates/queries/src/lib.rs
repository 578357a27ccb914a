//! Read paths over the link mirror and the collaborator services.
//!
//! Unlike the write-path saga, these queries are best-effort: a failed
//! enrichment lookup degrades a single entry to placeholder or partial
//! data instead of failing the whole listing.

pub mod error;
pub mod service;
pub mod types;

pub use error::{QueryError, Result};
pub use service::QueryService;
pub use types::{CollaboratorPage, CollaboratorView, EnrichedLink, PageRequest, SearchKey};
