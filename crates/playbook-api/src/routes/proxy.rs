//! Generic passthrough endpoint: `/api/proxy?path=/some/backend/path`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{error_response, relay};
use crate::types::ProxyState;

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    #[serde(default)]
    pub path: String,
}

fn backend_url(state: &ProxyState, path: &str) -> Result<String, Response> {
    if !path.starts_with('/') {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "path must start with '/'",
        ));
    }
    Ok(format!("{}{}", state.backend_url.trim_end_matches('/'), path))
}

/// Handler for GET /api/proxy.
pub async fn proxy_get_handler(
    State(state): State<Arc<ProxyState>>,
    Query(params): Query<ProxyParams>,
) -> Response {
    match backend_url(&state, &params.path) {
        Ok(url) => relay(state.client.get(&url)).await,
        Err(rejection) => rejection,
    }
}

/// Handler for POST /api/proxy.
pub async fn proxy_post_handler(
    State(state): State<Arc<ProxyState>>,
    Query(params): Query<ProxyParams>,
    Json(body): Json<Value>,
) -> Response {
    match backend_url(&state, &params.path) {
        Ok(url) => relay(state.client.post(&url).json(&body)).await,
        Err(rejection) => rejection,
    }
}
