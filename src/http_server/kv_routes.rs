//! Key-Value HTTP Routes
//!
//! `PUT /bloomfilter/:key` stores the raw request body.
//! `GET /bloomfilter/:key` returns the stored bytes, or 404.
//!
//! The key is the percent-decoded path segment taken as raw bytes, so
//! segments that do not decode to UTF-8 are still valid keys.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::engine::{EngineError, StorageEngine};

// ==================
// Shared State
// ==================

/// State shared across key-value handlers
#[derive(Debug, Clone)]
pub struct KvState {
    pub engine: Arc<dyn StorageEngine>,
}

impl KvState {
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self { engine }
    }
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn engine_error_response(err: &EngineError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err.to_string())
}

/// Decode the key from the last path segment
fn key_from_uri(uri: &Uri) -> Vec<u8> {
    let segment = uri.path().rsplit('/').next().unwrap_or_default();
    percent_decode_str(segment).collect()
}

// ==================
// Routes
// ==================

/// Create key-value routes
pub fn kv_routes(state: Arc<KvState>) -> Router {
    Router::new()
        .route("/bloomfilter/:key", get(get_value).put(put_value))
        .with_state(state)
}

async fn put_value(
    State(state): State<Arc<KvState>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Response {
    let key_bytes = key_from_uri(&uri);
    let key = String::from_utf8_lossy(&key_bytes);
    let result = state.engine.put(&key_bytes, &body).await;

    match result {
        Ok(()) => {
            tracing::info!(key = %key, len = body.len(), "PUT");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            tracing::error!(key = %key, len = body.len(), error = %e, "PUT failed");
            engine_error_response(&e)
        }
    }
}

async fn get_value(
    State(state): State<Arc<KvState>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let key_bytes = key_from_uri(&uri);
    let key = String::from_utf8_lossy(&key_bytes);

    match state.engine.get(&key_bytes).await {
        Ok(Some(value)) => {
            tracing::info!(key = %key, len = value.len(), "GET");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/octet-stream")],
                value,
            )
                .into_response()
        }
        Ok(None) => {
            tracing::info!(key = %key, "GET not found");
            error_response(StatusCode::NOT_FOUND, format!("Key not found: {}", key))
        }
        Err(e) => {
            tracing::error!(key = %key, error = %e, "GET failed");
            engine_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_status() {
        let response = engine_error_response(&EngineError::Query("timed out".into()));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = engine_error_response(&EngineError::Storage("corrupt page".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_key_from_uri() {
        let uri: Uri = "/bloomfilter/user%20ids".parse().unwrap();
        assert_eq!(key_from_uri(&uri), b"user ids".to_vec());

        let uri: Uri = "/bloomfilter/%FF%FE".parse().unwrap();
        assert_eq!(key_from_uri(&uri), vec![0xFF, 0xFE]);

        let uri: Uri = "/bloomfilter/a%2Fb?ignored=1".parse().unwrap();
        assert_eq!(key_from_uri(&uri), b"a/b".to_vec());
    }

    #[test]
    fn test_error_response_serialization() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "Key not found: bob".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"Key not found: bob"}"#);
    }
}
