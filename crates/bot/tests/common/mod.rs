#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use renderq_bot::lifecycle::JobLifecycle;
use renderq_bot::replies::Reply;
use renderq_bot::router::{CommandRouter, InteractionResponder};
use renderq_bot::routes;
use renderq_bot::state::AppState;
use renderq_db::DbPool;
use renderq_discord::api::DiscordApiError;
use renderq_discord::messages::Interaction;

/// Permission bitfield carrying `MANAGE_GUILD`.
pub const STAFF: &str = "32";
/// Permission bitfield without any staff bits.
pub const MEMBER: &str = "0";

/// Build the keep-alive app exactly as `main.rs` does.
pub fn build_test_app(pool: DbPool) -> Router {
    routes::build_app(AppState { pool })
}

pub fn test_router(pool: DbPool) -> CommandRouter {
    CommandRouter::new(JobLifecycle::new(pool), Duration::from_secs(3))
}

/// A guild slash-command interaction invoked by `user_id` holding `permissions`.
pub fn interaction(name: &str, options: Value, user_id: &str, permissions: &str) -> Interaction {
    serde_json::from_value(json!({
        "id": format!("interaction-{name}-{user_id}"),
        "application_id": "app-1",
        "type": 2,
        "token": "interaction-token",
        "guild_id": "guild-1",
        "member": {
            "user": {"id": user_id, "username": user_id},
            "permissions": permissions,
        },
        "data": {"name": name, "options": options},
    }))
    .unwrap()
}

pub fn submit(description: &str, user_id: &str) -> Interaction {
    interaction(
        "submit-render",
        json!([{"name": "description", "type": 3, "value": description}]),
        user_id,
        MEMBER,
    )
}

pub fn queue(permissions: &str) -> Interaction {
    interaction("queue", json!([]), "staff-a", permissions)
}

pub fn claim(job_id: i64, user_id: &str, permissions: &str) -> Interaction {
    interaction(
        "claim",
        json!([{"name": "job_id", "type": 4, "value": job_id}]),
        user_id,
        permissions,
    )
}

pub fn complete(job_id: i64, result_url: &str, permissions: &str) -> Interaction {
    interaction(
        "complete",
        json!([
            {"name": "job_id", "type": 4, "value": job_id},
            {"name": "result_url", "type": 3, "value": result_url}
        ]),
        "staff-a",
        permissions,
    )
}

/// Responder that records every reply instead of calling Discord.
#[derive(Clone, Default)]
pub struct RecordingResponder {
    pub replies: Arc<Mutex<Vec<(String, Reply)>>>,
}

impl RecordingResponder {
    pub fn recorded(&self) -> Vec<(String, Reply)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl InteractionResponder for RecordingResponder {
    async fn respond(&self, interaction: &Interaction, reply: Reply) -> Result<(), DiscordApiError> {
        self.replies
            .lock()
            .unwrap()
            .push((interaction.id.clone(), reply));
        Ok(())
    }
}

/// Send a GET request through the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
