//! HTTP client for the chat backend.
//!
//! The UI thread never blocks on the network: each request runs on a
//! worker thread and reports back through an mpsc channel the app polls
//! once per frame. Overlapping requests are prevented at the UI level
//! (input is disabled while one is pending), so no sequencing of
//! responses is done here.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use playbook_core::SubgraphPayload;

/// One turn of the conversation as the backend expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    pub use_graph: bool,
}

/// Response body from `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub graph_data: Option<SubgraphPayload>,
    #[serde(default)]
    pub search_process: Option<SearchProcess>,
}

/// One step of the backend's retrieval pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchStep {
    pub step: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A term the retrieval matched in the knowledge base.
#[derive(Debug, Clone, Deserialize)]
pub struct FoundTerm {
    pub term: String,
    pub category: String,
}

/// How the backend arrived at an answer. Every field is optional on the
/// wire; missing ones default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchProcess {
    #[serde(default)]
    pub steps: Vec<SearchStep>,
    #[serde(default)]
    pub found_terms: Vec<FoundTerm>,
    #[serde(default)]
    pub center_term: Option<String>,
    #[serde(default)]
    pub nodes_count: usize,
    #[serde(default)]
    pub edges_count: usize,
    #[serde(default)]
    pub traversal_log: Vec<String>,
    #[serde(default)]
    pub reasoning_chain: Vec<String>,
}

/// Outcome of one chat request.
#[derive(Debug)]
pub enum ChatEvent {
    Answered(ChatResponse),
    Failed(String),
}

/// Chat backend client with one in-flight request at a time.
pub struct ChatClient {
    backend_url: String,
    pending: bool,
    tx: Sender<ChatEvent>,
    rx: Receiver<ChatEvent>,
}

impl ChatClient {
    pub fn new(backend_url: String) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend_url,
            pending: false,
            tx,
            rx,
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Fire a chat request on a worker thread. Ignored while another
    /// request is pending.
    pub fn send(&mut self, messages: Vec<ChatTurn>) {
        if self.pending {
            warn!("chat request dropped: another request is in flight");
            return;
        }
        self.pending = true;

        let url = format!("{}/api/chat", self.backend_url.trim_end_matches('/'));
        let request = ChatRequest {
            messages,
            use_graph: true,
        };
        let tx = self.tx.clone();

        debug!(%url, turns = request.messages.len(), "sending chat request");
        std::thread::spawn(move || {
            let event = match post_chat(&url, &request) {
                Ok(response) => ChatEvent::Answered(response),
                Err(error) => {
                    warn!(%error, "chat request failed");
                    ChatEvent::Failed(error)
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Poll for a finished request. Call once per frame.
    pub fn poll(&mut self) -> Option<ChatEvent> {
        match self.rx.try_recv() {
            Ok(event) => {
                self.pending = false;
                Some(event)
            }
            Err(_) => None,
        }
    }
}

fn post_chat(url: &str, request: &ChatRequest) -> Result<ChatResponse, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| format!("Client error: {}", e))?;

    let response = client
        .post(url)
        .json(request)
        .send()
        .map_err(|e| format!("Network error: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(
                "Chat service unavailable. The backend has no OPENAI_API_KEY configured."
                    .to_string(),
            );
        }
        // FastAPI puts the human-readable message in `detail`.
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));
        return Err(match detail {
            Some(detail) => detail,
            None => format!("HTTP {}: {}", status.as_u16(), body),
        });
    }

    response
        .json::<ChatResponse>()
        .map_err(|e| format!("JSON parse error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_wire_shape() {
        let request = ChatRequest {
            messages: vec![ChatTurn {
                role: "user".to_string(),
                content: "What is Clover used for?".to_string(),
            }],
            use_graph: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["use_graph"], true);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn chat_response_tolerates_missing_optional_fields() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert!(response.graph_data.is_none());
        assert!(response.search_process.is_none());

        let response: ChatResponse = serde_json::from_str(
            r#"{"message": "hi", "search_process": {"center_term": "Clover"}}"#,
        )
        .unwrap();
        let process = response.search_process.unwrap();
        assert_eq!(process.center_term.as_deref(), Some("Clover"));
        assert!(process.steps.is_empty());
        assert_eq!(process.nodes_count, 0);
    }
}
