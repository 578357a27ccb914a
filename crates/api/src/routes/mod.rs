//! HTTP route handlers.

pub mod collaborators;
pub mod links;
pub mod metrics;
