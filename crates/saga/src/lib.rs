//! Linking saga for collaborator-to-project membership.
//!
//! The saga is a synchronous, request-scoped pipeline:
//! 1. Gather the collaborator's profile and skills
//! 2. Resolve the canonical email from the identity service
//! 3. Short-circuit if a local link already exists
//! 4. Notify the authoritative external registry (409 counts as success)
//! 5. Persist the local mirror with an idempotent insert
//!
//! There is no compensation and no retry: a failure at any step aborts
//! the remainder and surfaces a typed error. A registry notification
//! that was already sent is never undone.

pub mod coordinator;
pub mod error;
pub mod state;

pub use coordinator::{LinkCoordinator, LinkResult};
pub use error::LinkError;
pub use state::LinkPhase;
