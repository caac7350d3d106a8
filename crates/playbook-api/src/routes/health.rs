//! Health endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::types::{HealthResponse, ProxyState};

/// Handler for GET /api/health.
pub async fn health_handler(State(state): State<Arc<ProxyState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: state.backend_url.clone(),
    })
}
