use crate::render_job::RenderJobStatus;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid transition for job {id}: {from} -> {to}")]
    InvalidTransition {
        id: DbId,
        from: RenderJobStatus,
        to: RenderJobStatus,
    },
}
