//! Repository for the `renders` table.
//!
//! Status literals are always bound from [`RenderJobStatus`]; no raw
//! status strings appear in the SQL.

use renderq_core::render_job::RenderJobStatus;
use renderq_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::render_job::RenderJob;

/// Column list for `renders` queries.
const COLUMNS: &str = "id, user_id, description, status, assigned_to, result_url, created_at";

/// Provides CRUD operations for render jobs.
pub struct RenderJobRepo;

impl RenderJobRepo {
    /// Insert a new pending job and return the stored row.
    pub async fn insert(
        pool: &SqlitePool,
        requester_id: &str,
        description: Option<&str>,
    ) -> Result<RenderJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO renders (user_id, description, status) \
             VALUES (?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RenderJob>(&query)
            .bind(requester_id)
            .bind(description)
            .bind(RenderJobStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<RenderJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM renders WHERE id = ?");
        sqlx::query_as::<_, RenderJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every job that is not complete, oldest first.
    pub async fn list_open(pool: &SqlitePool) -> Result<Vec<RenderJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM renders WHERE status != ? ORDER BY id ASC");
        sqlx::query_as::<_, RenderJob>(&query)
            .bind(RenderJobStatus::Complete.as_str())
            .fetch_all(pool)
            .await
    }

    /// Number of jobs that are not complete.
    pub async fn count_open(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM renders WHERE status != ?")
            .bind(RenderJobStatus::Complete.as_str())
            .fetch_one(pool)
            .await
    }

    /// Move a pending job to in-progress and record who claimed it.
    ///
    /// Only rows currently `pending` are touched. Returns the number of
    /// rows changed: `0` means the job does not exist or is not pending,
    /// which is not an error at this layer.
    pub async fn update_claim(
        pool: &SqlitePool,
        id: DbId,
        assignee: &str,
    ) -> Result<u64, sqlx::Error> {
        Self::transition(
            pool,
            id,
            RenderJobStatus::InProgress,
            "assigned_to",
            assignee,
        )
        .await
    }

    /// Move an in-progress job to complete and record its result URL.
    ///
    /// Same zero-row semantics as [`update_claim`](Self::update_claim).
    pub async fn update_complete(
        pool: &SqlitePool,
        id: DbId,
        result_url: &str,
    ) -> Result<u64, sqlx::Error> {
        Self::transition(pool, id, RenderJobStatus::Complete, "result_url", result_url).await
    }

    /// Conditional single-row update: set `status = to` and `column = value`
    /// only while the row is still in the predecessor of `to`.
    async fn transition(
        pool: &SqlitePool,
        id: DbId,
        to: RenderJobStatus,
        column: &'static str,
        value: &str,
    ) -> Result<u64, sqlx::Error> {
        let Some(from) = to.required_predecessor() else {
            return Ok(0);
        };

        let query = format!("UPDATE renders SET status = ?, {column} = ? WHERE id = ? AND status = ?");
        let result = sqlx::query(&query)
            .bind(to.as_str())
            .bind(value)
            .bind(id)
            .bind(from.as_str())
            .execute(pool)
            .await?;

        tracing::debug!(
            job_id = id,
            from = %from,
            to = %to,
            rows_affected = result.rows_affected(),
            "Render job transition",
        );

        Ok(result.rows_affected())
    }
}
