//! Cache Facade
//!
//! The synchronised surface through which every mutation passes. Each
//! public operation is one critical section over a single exclusive
//! lock: validate, append to the write-ahead log, mutate the store,
//! enqueue replication. Holding the lock across the log append is what
//! makes the log order equal the store-mutation order.
//!
//! A write lock is taken even for get, because a hit mutates recency and
//! refreshes the TTL window.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, LruStore, PutOutcome};
use crate::error::{CacheError, Result};
use crate::replication::{ReplicationQueue, ReplicationTask};
use crate::wal::{Record, WalWriter};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Inner State ==
/// Everything the critical section covers.
#[derive(Debug)]
struct CacheInner {
    store: LruStore,
    /// Attached log stream; while None, mutations succeed but are not
    /// durable (the startup window between replay and attach)
    wal: Option<WalWriter>,
    /// Present only on a primary
    replication: Option<ReplicationQueue>,
}

// == Cache Facade ==
/// Cloneable handle to the synchronised cache.
#[derive(Debug, Clone)]
pub struct Cache {
    inner: Arc<RwLock<CacheInner>>,
}

impl Cache {
    // == Constructor ==
    /// Wraps a store, with no log attached and no replication.
    pub fn new(store: LruStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                store,
                wal: None,
                replication: None,
            })),
        }
    }

    // == Lifecycle ==
    /// Attaches the log stream. Mutations from here on are durable.
    pub async fn attach_wal(&self, wal: WalWriter) {
        self.inner.write().await.wal = Some(wal);
    }

    /// Detaches and returns the log stream so the caller can close it.
    pub async fn detach_wal(&self) -> Option<WalWriter> {
        self.inner.write().await.wal.take()
    }

    /// Attaches the replication queue; the node becomes a primary.
    pub async fn attach_replication(&self, queue: ReplicationQueue) {
        self.inner.write().await.replication = Some(queue);
    }

    /// Detaches the replication queue. Dropping the returned handle (or
    /// ignoring it) closes the worker channels so they drain and exit.
    pub async fn detach_replication(&self) -> Option<ReplicationQueue> {
        self.inner.write().await.replication.take()
    }

    // == Get ==
    /// Looks up a key. A miss has no error condition.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.write().await;
        inner.store.fetch(key)
    }

    // == Put ==
    /// Stores a key-value pair: log append, then store mutation, then
    /// replication enqueue, all in one critical section. If the append
    /// fails the store is left untouched and the error propagates.
    pub async fn put(&self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;
        validate_value(&value)?;

        let mut inner = self.inner.write().await;
        if let Some(wal) = inner.wal.as_mut() {
            wal.append(&Record::Put {
                key: key.clone(),
                value: value.clone(),
            })?;
        }

        let outcome = inner.store.insert(key.clone(), value.clone());
        if let PutOutcome::Evicted(victim) = &outcome {
            debug!(key = %key, victim = %victim, "insert evicted the least recently used entry");
        }

        if let Some(queue) = inner.replication.as_ref() {
            queue.enqueue(ReplicationTask::Put { key, value });
        }
        Ok(())
    }

    // == Remove ==
    /// Removes a key. Removing an absent key is a success and still
    /// logs a DEL record: replaying a duplicate DEL is a no-op, so the
    /// log never needs to know whether the key existed.
    pub async fn remove(&self, key: String) -> Result<()> {
        validate_key(&key)?;

        let mut inner = self.inner.write().await;
        if let Some(wal) = inner.wal.as_mut() {
            wal.append(&Record::Del { key: key.clone() })?;
        }

        inner.store.erase(&key);

        if let Some(queue) = inner.replication.as_ref() {
            queue.enqueue(ReplicationTask::Del { key });
        }
        Ok(())
    }

    // == Replicated Apply ==
    /// Applies a PUT forwarded by a primary. Recovery mode: no log
    /// append, no replication enqueue; the store semantics are those of
    /// a normal put.
    pub async fn apply_replicated_put(&self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;
        validate_value(&value)?;

        let mut inner = self.inner.write().await;
        inner.store.insert(key, value);
        Ok(())
    }

    /// Applies a DEL forwarded by a primary. Recovery mode, idempotent.
    pub async fn apply_replicated_remove(&self, key: String) -> Result<()> {
        validate_key(&key)?;

        let mut inner = self.inner.write().await;
        inner.store.erase(&key);
        Ok(())
    }

    // == Introspection ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.store.stats()
    }

    /// Returns the number of entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    /// Returns all keys from the MRU end to the LRU end.
    pub async fn keys_mru_to_lru(&self) -> Vec<String> {
        self.inner.read().await.store.keys_mru_to_lru()
    }
}

// == Validation ==
// The log format reserves comma and newline as structure; neither can
// appear in a key or value because no escaping is defined.

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.contains(',') || key.contains('\n') || key.contains('\r') {
        return Err(CacheError::InvalidRequest(
            "key must not contain commas or line breaks".to_string(),
        ));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<()> {
    if value.len() > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidRequest(format!(
            "value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }
    if value.contains(',') || value.contains('\n') || value.contains('\r') {
        return Err(CacheError::InvalidRequest(
            "value must not contain commas or line breaks".to_string(),
        ));
    }
    Ok(())
}
