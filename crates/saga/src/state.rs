//! Linking saga state machine.

use serde::{Deserialize, Serialize};

/// The phase a linking request is in.
///
/// Phase transitions:
/// ```text
/// Start ──► FetchingCollaboratorData ──► FetchingIdentity
///       ──► CheckingLocalDuplicate ──► NotifyingRegistry
///       ──► PersistingLocal ──► Done
/// ```
/// `Failed` is terminal and reachable from every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkPhase {
    /// Request received, nothing fetched yet.
    #[default]
    Start,

    /// Gathering profile and skills from their owning services.
    FetchingCollaboratorData,

    /// Resolving the canonical email from the identity service.
    FetchingIdentity,

    /// Checking the local mirror for a pre-existing link.
    CheckingLocalDuplicate,

    /// Announcing the membership to the external registry.
    NotifyingRegistry,

    /// Writing the local mirror row.
    PersistingLocal,

    /// Link confirmed locally and remotely (terminal).
    Done,

    /// A step failed and the remainder was skipped (terminal).
    Failed,
}

impl LinkPhase {
    /// Returns true if this is a terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LinkPhase::Done | LinkPhase::Failed)
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPhase::Start => "Start",
            LinkPhase::FetchingCollaboratorData => "FetchingCollaboratorData",
            LinkPhase::FetchingIdentity => "FetchingIdentity",
            LinkPhase::CheckingLocalDuplicate => "CheckingLocalDuplicate",
            LinkPhase::NotifyingRegistry => "NotifyingRegistry",
            LinkPhase::PersistingLocal => "PersistingLocal",
            LinkPhase::Done => "Done",
            LinkPhase::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for LinkPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
