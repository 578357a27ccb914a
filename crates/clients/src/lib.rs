//! Clients for the external services the linking saga depends on.
//!
//! Each downstream service is represented by a trait with an HTTP
//! implementation (base URL injected at construction) and an in-memory
//! test double:
//! - [`ProfileClient`] — collaborator profile summaries
//! - [`SkillsClient`] — ordered skill entries per collaborator
//! - [`IdentityClient`] — canonical user records and the paged roster
//! - [`RegistryClient`] — the authoritative project membership registry
//!
//! [`CollaboratorAggregator`] combines the profile and skills clients and
//! applies the skill snapshot policy used when linking.

pub mod aggregator;
pub mod error;
pub mod identity;
pub mod profile;
pub mod registry;
pub mod skills;

pub use aggregator::{CollaboratorAggregator, CollaboratorData};
pub use error::ClientError;
pub use identity::{HttpIdentityClient, IdentityClient, IdentityRecord, InMemoryIdentityClient};
pub use profile::{HttpProfileClient, InMemoryProfileClient, ProfileClient, ProfileSummary};
pub use registry::{
    HttpRegistryClient, InMemoryRegistryClient, MembershipAck, NewMember, ProjectInfo,
    RegistryClient,
};
pub use skills::{HttpSkillsClient, InMemorySkillsClient, SkillEntry, SkillsClient};

/// Per-call timeout applied to every downstream request.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
