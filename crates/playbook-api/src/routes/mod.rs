//! Proxy route handlers.

mod chat;
mod health;
mod proxy;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, routing::post, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::types::{ErrorBody, ProxyState};

/// Create the proxy router with all endpoints.
pub fn create_proxy_router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/chat", post(chat::chat_handler))
        .route(
            "/api/proxy",
            get(proxy::proxy_get_handler).post(proxy::proxy_post_handler),
        )
        // Request tracing (enable with RUST_LOG=tower_http=info or higher)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Build an error response with an `{"error": ...}` body.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Relay an upstream response, preserving its status code.
pub(crate) async fn relay(request: reqwest::RequestBuilder) -> Response {
    match request.send().await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            match upstream.json::<serde_json::Value>().await {
                Ok(body) => (status, Json(body)).into_response(),
                Err(error) => {
                    tracing::warn!(%error, "backend returned a non-JSON body");
                    error_response(
                        StatusCode::BAD_GATEWAY,
                        format!("Invalid backend response: {}", error),
                    )
                }
            }
        }
        Err(error) => {
            tracing::warn!(%error, "failed to reach backend");
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Failed to reach backend: {}", error),
            )
        }
    }
}
