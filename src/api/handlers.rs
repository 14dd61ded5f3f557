//! API Handlers
//!
//! HTTP request handlers for each endpoint. Handlers are thin: the
//! facade owns validation, synchronisation, logging and replication;
//! a handler only maps between wire DTOs and facade calls.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::Cache;
use crate::error::Result;
use crate::models::{
    ApplyRequest, ApplyResponse, DeleteResponse, GetResponse, HealthResponse, PutRequest,
    PutResponse, StatsResponse,
};
use crate::replication;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The synchronised cache facade
    pub cache: Cache,
}

impl AppState {
    /// Creates a new AppState around a cache facade.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair. Fails only when the request is malformed or
/// the log append fails; in the latter case the mutation did not happen.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    state.cache.put(req.key, req.value).await?;
    Ok(Json(PutResponse::ok()))
}

/// Handler for GET /get/:key
///
/// A miss is a normal response, not an error.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<GetResponse> {
    match state.cache.get(&key).await {
        Some(value) => Json(GetResponse::found(value)),
        None => Json(GetResponse::miss()),
    }
}

/// Handler for DELETE /del/:key
///
/// Deleting an absent key is a success.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.remove(key).await?;
    Ok(Json(DeleteResponse::ok()))
}

/// Handler for POST /replicate
///
/// Accepts a mutation forwarded by a primary and applies it in recovery
/// mode. An unknown op_type is answered with 400.
pub async fn replicate_handler(
    State(state): State<AppState>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>> {
    let response = replication::apply(&state.cache, req).await?;
    Ok(Json(response))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruStore;

    fn state() -> AppState {
        AppState::new(Cache::new(LruStore::new(100, 0)))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = state();

        let req = PutRequest {
            key: "test_key".to_string(),
            value: "test_value".to_string(),
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("test_key".to_string())).await;
        assert!(response.found);
        assert_eq!(response.value, "test_value");
    }

    #[tokio::test]
    async fn test_get_miss_is_not_an_error() {
        let state = state();

        let response = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(!response.found);
        assert_eq!(response.value, "");
    }

    #[tokio::test]
    async fn test_delete_handler_absent_key_succeeds() {
        let state = state();

        let result = delete_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(result.unwrap().success);
    }

    #[tokio::test]
    async fn test_set_rejects_invalid_key() {
        let state = state();

        let req = PutRequest {
            key: "a,b".to_string(),
            value: "v".to_string(),
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_replicate_handler_applies_put() {
        let state = state();

        let req = ApplyRequest {
            op_type: "PUT".to_string(),
            key: "k".to_string(),
            value: "v".to_string(),
        };
        let result = replicate_handler(State(state.clone()), Json(req)).await;
        assert!(result.unwrap().success);

        let response = get_handler(State(state), Path("k".to_string())).await;
        assert!(response.found);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
