//! Replication Consumer
//!
//! Applies mutations forwarded by a primary to the local cache facade.
//! The facade's recovery-mode operations guarantee the mutation is
//! neither appended to this node's log nor forwarded onward, so a chain
//! of replicas can never amplify traffic.

use tracing::debug;

use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::models::{ApplyRequest, ApplyResponse};

// == Apply ==
/// Dispatches one inbound replication request.
///
/// PUT and DEL map to the facade's replicated-apply operations; both are
/// idempotent under re-delivery, which is what lets the producer promise
/// only at-least-once. An unrecognised tag is a protocol error.
pub async fn apply(cache: &Cache, request: ApplyRequest) -> Result<ApplyResponse> {
    debug!(op = %request.op_type, key = %request.key, "applying replicated operation");

    match request.op_type.as_str() {
        "PUT" => cache.apply_replicated_put(request.key, request.value).await?,
        // Value is ignored for DEL.
        "DEL" => cache.apply_replicated_remove(request.key).await?,
        other => {
            return Err(CacheError::InvalidRequest(format!(
                "unknown replication op_type: {}",
                other
            )))
        }
    }

    Ok(ApplyResponse::ok())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruStore;

    fn replica_cache() -> Cache {
        Cache::new(LruStore::new(10, 0))
    }

    fn put_request(key: &str, value: &str) -> ApplyRequest {
        ApplyRequest {
            op_type: "PUT".to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn del_request(key: &str) -> ApplyRequest {
        ApplyRequest {
            op_type: "DEL".to_string(),
            key: key.to_string(),
            value: String::new(),
        }
    }

    #[tokio::test]
    async fn test_apply_put_then_del() {
        let cache = replica_cache();

        let response = apply(&cache, put_request("k", "v")).await.unwrap();
        assert!(response.success);
        assert_eq!(cache.get("k").await, Some("v".to_string()));

        let response = apply(&cache, del_request("k")).await.unwrap();
        assert!(response.success);
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let cache = replica_cache();

        apply(&cache, put_request("k", "v")).await.unwrap();
        apply(&cache, put_request("k", "v")).await.unwrap();
        assert_eq!(cache.len().await, 1);

        apply(&cache, del_request("k")).await.unwrap();
        apply(&cache, del_request("k")).await.unwrap();
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_apply_unknown_op_is_protocol_error() {
        let cache = replica_cache();

        let request = ApplyRequest {
            op_type: "EXPIRE".to_string(),
            key: "k".to_string(),
            value: String::new(),
        };
        let result = apply(&cache, request).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_apply_del_ignores_value() {
        let cache = replica_cache();
        apply(&cache, put_request("k", "v")).await.unwrap();

        let mut request = del_request("k");
        request.value = "whatever".to_string();
        apply(&cache, request).await.unwrap();
        assert_eq!(cache.get("k").await, None);
    }
}
