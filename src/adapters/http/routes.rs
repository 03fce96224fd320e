//! Route definitions for check-in endpoints

use axum::routing::{get, post};
use axum::{Json, Router};

use super::handlers::{get_conversation, open_conversation, send_checkin_message, AppState};

/// Create the check-in router with all endpoints
///
/// # Endpoints
///
/// - `POST /checkin/conversations` - Open a conversation
/// - `POST /checkin/conversations/{conversation_id}/messages` - Send a chat turn
/// - `GET /checkin/conversations/{conversation_id}` - Get the conversation view
/// - `GET /health` - Liveness probe
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkin/conversations", post(open_conversation))
        .route(
            "/checkin/conversations/:conversation_id/messages",
            post(send_checkin_message),
        )
        .route(
            "/checkin/conversations/:conversation_id",
            get(get_conversation),
        )
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
