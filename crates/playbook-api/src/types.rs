//! Proxy state and response DTOs.

use serde::{Deserialize, Serialize};

/// Shared state for the proxy: where the backend lives and the reusable
/// HTTP client.
pub struct ProxyState {
    /// Backend base URL, e.g. `http://localhost:8000`.
    pub backend_url: String,
    /// Upstream HTTP client.
    pub client: reqwest::Client,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Proxy status.
    pub status: String,
    /// Configured backend base URL.
    pub backend: String,
}

/// Error body returned for failed upstream calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable error message.
    pub error: String,
}
