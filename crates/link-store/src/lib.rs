//! Local link store: the relational mirror of confirmed links.
//!
//! The store holds at most one [`LinkRecord`] per (project, user) pair.
//! Its insert is idempotent: on key conflict it returns the existing
//! record instead of erroring, which is what makes the linking saga safe
//! under retries and concurrent requests.
//!
//! Two implementations are provided: [`InMemoryLinkStore`] for tests and
//! [`PostgresLinkStore`] backed by `sqlx`.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryLinkStore;
pub use postgres::PostgresLinkStore;
pub use record::LinkRecord;
pub use store::{InsertOutcome, LinkMetrics, LinkStore};
