//! Chat forwarding endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use super::relay;
use crate::types::ProxyState;

/// Handler for POST /api/chat - forwards the body to the backend chat
/// endpoint verbatim and relays the answer.
pub async fn chat_handler(
    State(state): State<Arc<ProxyState>>,
    Json(body): Json<Value>,
) -> Response {
    let url = format!("{}/api/chat", state.backend_url.trim_end_matches('/'));
    relay(state.client.post(&url).json(&body)).await
}
