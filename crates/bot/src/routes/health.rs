use axum::extract::State;
use axum::{routing::get, Json, Router};
use renderq_db::repositories::RenderJobRepo;
use serde::Serialize;

use crate::state::AppState;

/// `GET /health` payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the store answered, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Jobs still waiting or being worked on; absent when the store is down.
    pub open_jobs: Option<i64>,
}

/// Report liveness together with the depth of the render queue.
///
/// The open-job count doubles as the store probe: if it fails the store
/// is considered unhealthy.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let open_jobs = match RenderJobRepo::count_open(&state.pool).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the store");
            None
        }
    };
    let db_healthy = open_jobs.is_some();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        open_jobs,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
