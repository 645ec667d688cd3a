use axum::{routing::get, Router};

use crate::state::AppState;

/// Body returned by `GET /`; uptime monitors match on it.
pub const KEEPALIVE_BODY: &str = "Bot is running via Render.";

async fn keepalive() -> &'static str {
    KEEPALIVE_BODY
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(keepalive))
}
