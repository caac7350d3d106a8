//! Reverse proxy for the Playbook chat backend.
//!
//! The viewer talks to one origin; this crate forwards requests to the
//! GraphRAG backend so the backend address stays server-side
//! configuration.
//!
//! ## Endpoints
//!
//! - `POST /api/chat` - Forward a chat request to the backend
//! - `GET /api/proxy?path=/...` - Generic GET passthrough
//! - `POST /api/proxy?path=/...` - Generic POST passthrough
//! - `GET /api/health` - Proxy health and configured backend
//!
//! Upstream failures never surface as proxy panics; they map to a
//! `502 Bad Gateway` with an `{"error": ...}` body.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use playbook_api::{create_proxy_router, create_proxy_state};
//!
//! let state = create_proxy_state("http://localhost:8000");
//! let router = create_proxy_router(state);
//! ```

mod routes;
mod types;

pub use routes::create_proxy_router;
pub use types::{ErrorBody, HealthResponse, ProxyState};

use std::sync::Arc;

/// Create proxy state for the given backend base URL.
pub fn create_proxy_state(backend_url: impl Into<String>) -> Arc<ProxyState> {
    Arc::new(ProxyState {
        backend_url: backend_url.into(),
        client: reqwest::Client::new(),
    })
}
