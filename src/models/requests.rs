//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies. Validation of
//! key and value contents happens in the cache facade, which owns the
//! log-format byte restrictions; these types are plain carriers.

use serde::{Deserialize, Serialize};

/// Request body for the PUT operation (PUT /set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    /// The cache key
    pub key: String,
    /// The value to store; may be empty
    #[serde(default)]
    pub value: String,
}

/// Request body for the replication apply operation (POST /replicate)
///
/// Sent by a primary's replication workers and accepted by replicas.
/// `op_type` is deliberately a plain string so an unknown tag can be
/// answered with an invalid-argument error instead of a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    /// Operation tag: "PUT" or "DEL"
    pub op_type: String,
    /// The key the operation affects
    pub key: String,
    /// The value for PUT; ignored for DEL
    #[serde(default)]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: PutRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_put_request_value_defaults_empty() {
        let json = r#"{"key": "test"}"#;
        let req: PutRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, "");
    }

    #[test]
    fn test_apply_request_roundtrip() {
        let req = ApplyRequest {
            op_type: "PUT".to_string(),
            key: "k".to_string(),
            value: "v".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: ApplyRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.op_type, "PUT");
        assert_eq!(back.key, "k");
        assert_eq!(back.value, "v");
    }

    #[test]
    fn test_apply_request_del_without_value() {
        let json = r#"{"op_type": "DEL", "key": "k"}"#;
        let req: ApplyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.op_type, "DEL");
        assert_eq!(req.value, "");
    }
}
