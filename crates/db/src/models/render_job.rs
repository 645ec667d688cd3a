//! Render job row model.

use renderq_core::render_job::RenderJobStatus;
use renderq_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `renders` table.
///
/// Column names follow the legacy `renders` schema; `status` is decoded
/// through [`RenderJobStatus::try_from`] so unknown text never reaches
/// the lifecycle code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RenderJob {
    pub id: DbId,
    /// Discord user id of the submitter.
    #[sqlx(rename = "user_id")]
    pub requester_id: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RenderJobStatus,
    /// Discord user id of the staff member who claimed the job.
    #[sqlx(rename = "assigned_to")]
    pub assignee: Option<String>,
    pub result_url: Option<String>,
    /// Nullable because legacy rows were written without a NOT NULL constraint.
    pub created_at: Option<Timestamp>,
}
