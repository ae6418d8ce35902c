//! HTTP API Tests
//!
//! Drives the full router in-process against a file engine.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use persistd::engine::{FileEngine, FileEngineConfig, StorageEngine};
use persistd::http_server::{HttpServer, HttpServerConfig};
use tempfile::TempDir;
use tower::ServiceExt;

fn router_with_limit(temp: &TempDir, max_value_bytes: usize) -> Router {
    let engine: Arc<dyn StorageEngine> =
        Arc::new(FileEngine::open(&FileEngineConfig::at(temp.path().join("api.db"))).unwrap());
    let config = HttpServerConfig {
        max_value_bytes,
        ..Default::default()
    };
    HttpServer::new(config, engine).router()
}

fn router(temp: &TempDir) -> Router {
    router_with_limit(temp, 1024 * 1024)
}

async fn send(router: &Router, method: Method, uri: &str, body: Vec<u8>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_put_then_get() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    let (status, _) = send(&app, Method::PUT, "/bloomfilter/alice", b"100".to_vec()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/bloomfilter/alice", vec![]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"100");

    let (status, _) = send(&app, Method::PUT, "/bloomfilter/alice", b"200".to_vec()).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/bloomfilter/alice", vec![]).await;
    assert_eq!(body, b"200");
}

#[tokio::test]
async fn test_get_missing_is_404() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    let (status, body) = send(&app, Method::GET, "/bloomfilter/bob", vec![]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("bob"));
}

#[tokio::test]
async fn test_empty_body_is_stored() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    send(&app, Method::PUT, "/bloomfilter/empty", vec![]).await;
    let (status, body) = send(&app, Method::GET, "/bloomfilter/empty", vec![]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_binary_body_and_content_type() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);
    let value: Vec<u8> = (0..=255u8).collect();

    send(&app, Method::PUT, "/bloomfilter/bits", value.clone()).await;

    let request = Request::builder()
        .uri("/bloomfilter/bits")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.to_vec(), value);
}

#[tokio::test]
async fn test_percent_encoded_key() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    send(&app, Method::PUT, "/bloomfilter/user%20ids", b"x".to_vec()).await;
    let (status, body) = send(&app, Method::GET, "/bloomfilter/user%20ids", vec![]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"x");
}

#[tokio::test]
async fn test_non_utf8_key_round_trips() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    let (status, _) = send(&app, Method::PUT, "/bloomfilter/%FF%FE", b"raw".to_vec()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/bloomfilter/%FF%FE", vec![]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"raw");

    let (status, _) = send(&app, Method::GET, "/bloomfilter/%FF", vec![]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The stored key is the decoded bytes, not the escaped text
    drop(app);
    let engine = FileEngine::open(&FileEngineConfig::at(temp.path().join("api.db"))).unwrap();
    assert_eq!(engine.get(&[0xFF, 0xFE]).await.unwrap(), Some(b"raw".to_vec()));
    assert_eq!(engine.get(b"%FF%FE").await.unwrap(), None);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let temp = TempDir::new().unwrap();
    let app = router_with_limit(&temp, 16);

    let (status, _) = send(&app, Method::PUT, "/bloomfilter/big", vec![0u8; 64]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (status, _) = send(&app, Method::GET, "/bloomfilter/big", vec![]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_engine() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    let (status, body) = send(&app, Method::GET, "/health", vec![]).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "file");
}

#[tokio::test]
async fn test_unsupported_method() {
    let temp = TempDir::new().unwrap();
    let app = router(&temp);

    let (status, _) = send(&app, Method::DELETE, "/bloomfilter/alice", vec![]).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
