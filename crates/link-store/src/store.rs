use async_trait::async_trait;
use common::{ProjectId, SkillSnapshot, UserId};
use serde::Serialize;

use crate::error::Result;
use crate::record::LinkRecord;

/// Outcome of an idempotent insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was created.
    Inserted(LinkRecord),
    /// The key already existed; the existing row is returned unchanged.
    AlreadyPresent(LinkRecord),
}

impl InsertOutcome {
    /// The record, whether freshly inserted or pre-existing.
    pub fn record(&self) -> &LinkRecord {
        match self {
            InsertOutcome::Inserted(record) | InsertOutcome::AlreadyPresent(record) => record,
        }
    }
}

/// Aggregate counts over the link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkMetrics {
    pub total_links: i64,
    pub unique_projects: i64,
    pub unique_collaborators: i64,
}

/// Storage contract for the local link mirror.
///
/// `insert_if_absent` must be atomic with respect to the (project, user)
/// uniqueness constraint; the conflict resolution lives in the store, not
/// in application-level locking.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Inserts a link unless the (project, user) key already exists.
    async fn insert_if_absent(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        skill: &SkillSnapshot,
    ) -> Result<InsertOutcome>;

    /// Looks up the link for a (project, user) pair.
    async fn find(&self, project_id: ProjectId, user_id: UserId) -> Result<Option<LinkRecord>>;

    /// Lists links for a project, newest first.
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<LinkRecord>>;

    /// Lists links for a user, newest first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<LinkRecord>>;

    /// Deletes the link for a (project, user) pair.
    ///
    /// Returns [`crate::StoreError::LinkNotFound`] when no row matched.
    async fn delete(&self, project_id: ProjectId, user_id: UserId) -> Result<()>;

    /// Computes aggregate counts over the whole table.
    async fn metrics(&self) -> Result<LinkMetrics>;
}
