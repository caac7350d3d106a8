//! Integration tests for the Playbook reverse proxy.
//!
//! A mock backend is spun up on an ephemeral port and the proxy router is
//! exercised with `tower::ServiceExt::oneshot`.
//!
//! Run with: `cargo test --package playbook-api --test proxy_integration`

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use playbook_api::{create_proxy_router, create_proxy_state};

/// Start a mock GraphRAG backend and return its base URL.
async fn spawn_mock_backend() -> String {
    let app = Router::new()
        .route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                let question = body["messages"]
                    .as_array()
                    .and_then(|m| m.last())
                    .and_then(|m| m["content"].as_str())
                    .unwrap_or("")
                    .to_string();
                Json(json!({
                    "message": format!("You asked: {}", question),
                    "graph_data": {
                        "nodes": [
                            {"id": "clover", "label": "Clover", "category": "Resource"}
                        ],
                        "edges": []
                    }
                }))
            }),
        )
        .route(
            "/api/terms",
            get(|| async { Json(json!({"terms": ["Clover", "Cherry"]})) }),
        )
        .route(
            "/api/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn proxy_for(backend: &str) -> Router {
    create_proxy_router(create_proxy_state(backend))
}

/// Helper to make a GET request.
async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!(null));

    (status, json)
}

/// Helper to make a POST request with a JSON body.
async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!(null));

    (status, json)
}

#[tokio::test]
async fn health_reports_ok_and_backend() {
    let backend = spawn_mock_backend().await;
    let proxy = proxy_for(&backend);

    let (status, body) = get_json(&proxy, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], backend);
}

#[tokio::test]
async fn chat_is_forwarded_and_answer_relayed() {
    let backend = spawn_mock_backend().await;
    let proxy = proxy_for(&backend);

    let (status, body) = post_json(
        &proxy,
        "/api/chat",
        json!({
            "messages": [{"role": "user", "content": "What is Clover used for?"}],
            "use_graph": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You asked: What is Clover used for?");
    assert_eq!(body["graph_data"]["nodes"][0]["id"], "clover");
}

#[tokio::test]
async fn generic_proxy_get_passes_through() {
    let backend = spawn_mock_backend().await;
    let proxy = proxy_for(&backend);

    let (status, body) = get_json(&proxy, "/api/proxy?path=/api/terms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["terms"][0], "Clover");
}

#[tokio::test]
async fn upstream_status_is_preserved() {
    let backend = spawn_mock_backend().await;
    let proxy = proxy_for(&backend);

    let (status, _body) = get_json(&proxy, "/api/proxy?path=/api/broken").await;
    // The backend answered (500), but with a non-JSON body; the proxy
    // reports a gateway error rather than crashing.
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unreachable_backend_maps_to_bad_gateway() {
    // Nothing listens on port 9; connection must fail fast.
    let proxy = proxy_for("http://127.0.0.1:9");

    let (status, body) = post_json(
        &proxy,
        "/api/chat",
        json!({"messages": [], "use_graph": true}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("backend"));
}

#[tokio::test]
async fn proxy_rejects_relative_paths() {
    let backend = spawn_mock_backend().await;
    let proxy = proxy_for(&backend);

    let (status, body) = get_json(&proxy, "/api/proxy?path=api/terms").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("path"));
}
