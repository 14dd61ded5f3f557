//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:key)
///
/// A miss is not an error: `found` is false and `value` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    /// Whether the cache returned a value
    pub found: bool,
    /// The stored value; empty when not found
    #[serde(default)]
    pub value: String,
}

impl GetResponse {
    /// Creates a hit response.
    pub fn found(value: impl Into<String>) -> Self {
        Self {
            found: true,
            value: value.into(),
        }
    }

    /// Creates a miss response.
    pub fn miss() -> Self {
        Self {
            found: false,
            value: String::new(),
        }
    }
}

/// Response body for the PUT operation (PUT /set)
///
/// `success` is false only when the log append failed, in which case the
/// mutation did not take effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutResponse {
    pub success: bool,
}

impl PutResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
///
/// Deleting an absent key is still a success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response body for the replication apply operation (POST /replicate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// Whether the replica's cache accepted the mutation
    pub success: bool,
}

impl ApplyResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
