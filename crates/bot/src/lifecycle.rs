//! Render job lifecycle controller.
//!
//! Exposes the user-facing verbs (submit, list, claim, complete) as a
//! state machine over [`RenderJobRepo`]. Transitions are applied with
//! conditional updates; when an update changes no row the job is read
//! back to tell "does not exist" apart from "wrong state".

use renderq_core::error::CoreError;
use renderq_core::render_job::RenderJobStatus;
use renderq_core::types::DbId;
use renderq_db::models::render_job::RenderJob;
use renderq_db::repositories::RenderJobRepo;
use renderq_db::DbPool;

/// Errors surfaced by lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The store failed; prior state is unchanged.
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Stateless controller; every call reads and writes through the store.
#[derive(Clone)]
pub struct JobLifecycle {
    pool: DbPool,
}

impl JobLifecycle {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a pending job. The description is stored verbatim.
    pub async fn submit_job(
        &self,
        requester_id: &str,
        description: &str,
    ) -> Result<RenderJob, LifecycleError> {
        let job = RenderJobRepo::insert(&self.pool, requester_id, Some(description)).await?;
        tracing::info!(job_id = job.id, requester_id, "Render job submitted");
        Ok(job)
    }

    /// Every job that is not complete, oldest first.
    pub async fn list_open_jobs(&self) -> Result<Vec<RenderJob>, LifecycleError> {
        Ok(RenderJobRepo::list_open(&self.pool).await?)
    }

    /// Assign a pending job to `actor_id` and move it to in-progress.
    pub async fn claim_job(&self, job_id: DbId, actor_id: &str) -> Result<RenderJob, LifecycleError> {
        let rows = RenderJobRepo::update_claim(&self.pool, job_id, actor_id).await?;
        let job = self
            .resolve_transition(job_id, rows, RenderJobStatus::InProgress)
            .await?;
        tracing::info!(job_id, actor_id, "Render job claimed");
        Ok(job)
    }

    /// Record the result of an in-progress job and close it.
    pub async fn complete_job(
        &self,
        job_id: DbId,
        result_url: &str,
    ) -> Result<RenderJob, LifecycleError> {
        let rows = RenderJobRepo::update_complete(&self.pool, job_id, result_url).await?;
        let job = self
            .resolve_transition(job_id, rows, RenderJobStatus::Complete)
            .await?;
        tracing::info!(job_id, result_url, "Render job completed");
        Ok(job)
    }

    /// Read the job back after a conditional update and classify the outcome.
    async fn resolve_transition(
        &self,
        job_id: DbId,
        rows_affected: u64,
        to: RenderJobStatus,
    ) -> Result<RenderJob, LifecycleError> {
        let job = RenderJobRepo::find_by_id(&self.pool, job_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RenderJob",
                id: job_id,
            })?;

        if rows_affected == 0 {
            return Err(CoreError::InvalidTransition {
                id: job_id,
                from: job.status,
                to,
            }
            .into());
        }

        Ok(job)
    }
}
