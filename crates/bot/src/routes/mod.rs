//! Keep-alive HTTP surface.
//!
//! Hosting platforms poll `GET /` to keep the process awake; `/health`
//! additionally reports whether the store is reachable.

pub mod health;
pub mod keepalive;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the keep-alive router with its middleware stack.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(keepalive::router())
        .merge(health::router())
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
