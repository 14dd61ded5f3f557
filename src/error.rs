//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache server.
///
/// Only two kinds ever reach a caller: a failed log append (the mutation
/// did not take effect) and a rejected request. Recovery and replication
/// problems are logged where they occur and never propagate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A write-ahead log append did not complete cleanly
    #[error("log write failed: {0}")]
    LogWrite(#[source] std::io::Error),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::LogWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
