use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{ProjectId, SkillSnapshot, UserId};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::record::LinkRecord;
use crate::store::{InsertOutcome, LinkMetrics, LinkStore};

#[derive(Default)]
struct InMemoryState {
    rows: Vec<LinkRecord>,
    next_id: i64,
}

/// In-memory link store for testing.
///
/// Provides the same contract as the PostgreSQL implementation,
/// including the idempotent insert.
#[derive(Clone, Default)]
pub struct InMemoryLinkStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryLinkStore {
    /// Creates a new empty in-memory link store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows stored.
    pub async fn row_count(&self) -> usize {
        self.state.read().await.rows.len()
    }
}

fn newest_first(rows: &mut [LinkRecord]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert_if_absent(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        skill: &SkillSnapshot,
    ) -> Result<InsertOutcome> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .rows
            .iter()
            .find(|r| r.project_id == project_id && r.user_id == user_id)
        {
            return Ok(InsertOutcome::AlreadyPresent(existing.clone()));
        }

        state.next_id += 1;
        let record = LinkRecord {
            id: state.next_id,
            project_id,
            user_id,
            skill_name: skill.name.clone(),
            skill_level: skill.level.clone(),
            created_at: Utc::now(),
        };
        state.rows.push(record.clone());
        Ok(InsertOutcome::Inserted(record))
    }

    async fn find(&self, project_id: ProjectId, user_id: UserId) -> Result<Option<LinkRecord>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .iter()
            .find(|r| r.project_id == project_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<LinkRecord>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .rows
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<LinkRecord>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn delete(&self, project_id: ProjectId, user_id: UserId) -> Result<()> {
        let mut state = self.state.write().await;
        let position = state
            .rows
            .iter()
            .position(|r| r.project_id == project_id && r.user_id == user_id);

        match position {
            Some(index) => {
                state.rows.remove(index);
                Ok(())
            }
            None => Err(StoreError::LinkNotFound {
                project_id,
                user_id,
            }),
        }
    }

    async fn metrics(&self) -> Result<LinkMetrics> {
        let state = self.state.read().await;
        let projects: HashSet<_> = state.rows.iter().map(|r| r.project_id).collect();
        let users: HashSet<_> = state.rows.iter().map(|r| r.user_id).collect();
        Ok(LinkMetrics {
            total_links: state.rows.len() as i64,
            unique_projects: projects.len() as i64,
            unique_collaborators: users.len() as i64,
        })
    }
}
