//! Mini Cache - a replicated in-memory LRU cache server
//!
//! A key/value cache with least-recently-used eviction, sliding TTL
//! expiration, crash recovery through a write-ahead log, and
//! asynchronous primary-to-replica replication over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod replication;
pub mod wal;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
