use async_trait::async_trait;
use common::{ProjectId, SkillSnapshot, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{Result, StoreError};
use crate::record::LinkRecord;
use crate::store::{InsertOutcome, LinkMetrics, LinkStore};

/// PostgreSQL-backed link store.
#[derive(Clone)]
pub struct PostgresLinkStore {
    pool: PgPool,
}

impl PostgresLinkStore {
    /// Creates a new PostgreSQL link store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_record(row: PgRow) -> Result<LinkRecord> {
        Ok(LinkRecord {
            id: row.try_get("id")?,
            project_id: ProjectId::new(row.try_get("project_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            skill_name: row.try_get("skill_name")?,
            skill_level: row.try_get("skill_level")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, project_id, user_id, skill_name, skill_level, created_at";

#[async_trait]
impl LinkStore for PostgresLinkStore {
    async fn insert_if_absent(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        skill: &SkillSnapshot,
    ) -> Result<InsertOutcome> {
        // Ignore-on-conflict plus a follow-up lookup: the unique
        // constraint resolves the race, and a losing writer reads back
        // the row that won.
        let inserted = sqlx::query(
            r#"
            INSERT INTO project_links (project_id, user_id, skill_name, skill_level)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id, user_id) DO NOTHING
            RETURNING id, project_id, user_id, skill_name, skill_level, created_at
            "#,
        )
        .bind(project_id.as_i64())
        .bind(user_id.as_i64())
        .bind(&skill.name)
        .bind(&skill.level)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Inserted(Self::row_to_record(row)?));
        }

        let existing = self
            .find(project_id, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(InsertOutcome::AlreadyPresent(existing))
    }

    async fn find(&self, project_id: ProjectId, user_id: UserId) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM project_links WHERE project_id = $1 AND user_id = $2"
        ))
        .bind(project_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM project_links
            WHERE project_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(project_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM project_links
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn delete(&self, project_id: ProjectId, user_id: UserId) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM project_links WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::LinkNotFound {
                project_id,
                user_id,
            });
        }
        Ok(())
    }

    async fn metrics(&self) -> Result<LinkMetrics> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_links,
                COUNT(DISTINCT project_id) AS unique_projects,
                COUNT(DISTINCT user_id) AS unique_collaborators
            FROM project_links
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(LinkMetrics {
            total_links: row.try_get("total_links")?,
            unique_projects: row.try_get("unique_projects")?,
            unique_collaborators: row.try_get("unique_collaborators")?,
        })
    }
}
