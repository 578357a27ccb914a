//! Shared types for the collaborator linking service.

pub mod types;

pub use types::{ProjectId, SkillSnapshot, UserId};
