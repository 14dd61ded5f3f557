//! Cache Store Module
//!
//! The LRU+TTL engine: a key index over an arena of slots plus a recency
//! list. The store is single-threaded; the facade serialises access.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use crate::cache::{CacheStats, Entry, RecencyList};

// == Slot ==
/// An occupied arena position. The key is kept alongside the entry so an
/// eviction at the LRU end can remove its index mapping.
#[derive(Debug)]
struct Slot {
    key: String,
    entry: Entry,
}

// == Put Outcome ==
/// What a touch-or-insert did to the store. Used for statistics and
/// tests; clients only ever see success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// A live entry for the key was updated in place
    Updated,
    /// An expired entry for the key was reaped and a fresh one inserted
    ReplacedExpired,
    /// A fresh entry was inserted below capacity
    Inserted,
    /// A fresh entry was inserted, evicting the named LRU key
    Evicted(String),
}

// == Cache Store ==
/// In-memory store with LRU eviction and sliding TTL expiration.
///
/// Invariants maintained across every operation:
/// - a key is in the index iff its slot is linked in the recency list;
/// - the index never holds more than `capacity` keys;
/// - the recency list orders entries by most recent successful touch.
#[derive(Debug)]
pub struct LruStore {
    /// Key to arena slot index
    index: HashMap<String, usize>,
    /// Slot arena; `None` marks a free slot
    slots: Vec<Option<Slot>>,
    /// Free slot indices available for reuse
    free: Vec<usize>,
    /// Access order over slot indices
    recency: RecencyList,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries
    capacity: usize,
    /// TTL in seconds; zero or negative disables expiration
    ttl_seconds: i64,
}

impl LruStore {
    // == Constructor ==
    /// Creates a new store with the given capacity and TTL.
    ///
    /// A capacity of zero cannot hold anything and is coerced to 1 with
    /// a diagnostic. A TTL of zero or below disables expiration.
    pub fn new(capacity: usize, ttl_seconds: i64) -> Self {
        let capacity = if capacity == 0 {
            warn!("invalid cache capacity 0, coercing to 1");
            1
        } else {
            capacity
        };

        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            recency: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
            ttl_seconds,
        }
    }

    // == Touch Or Insert ==
    /// Stores a key-value pair at the MRU position.
    ///
    /// A live existing entry is updated in place; an expired one is
    /// discarded first and the key inserted as if absent. Inserting a
    /// new key at capacity evicts the LRU entry regardless of its
    /// liveness.
    pub fn insert(&mut self, key: String, value: String) -> PutOutcome {
        if let Some(&idx) = self.index.get(&key) {
            if !self.slot_expired(idx) {
                if let Some(slot) = self.slots[idx].as_mut() {
                    slot.entry = Entry::new(value);
                    self.recency.move_to_front(idx);
                    return PutOutcome::Updated;
                }
            }
            // Present but expired: discard, then insert as if absent.
            self.remove_slot(idx);
            self.stats.record_expiration();
            self.insert_fresh(key, value);
            return PutOutcome::ReplacedExpired;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };
        self.insert_fresh(key, value);

        match evicted {
            Some(victim) => PutOutcome::Evicted(victim),
            None => PutOutcome::Inserted,
        }
    }

    // == Fetch ==
    /// Retrieves a value by key.
    ///
    /// A hit moves the entry to the MRU position and refreshes its
    /// last-touched instant: the TTL window slides on every access. An
    /// expired entry is reaped and reported as a miss.
    pub fn fetch(&mut self, key: &str) -> Option<String> {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if self.slot_expired(idx) {
            self.remove_slot(idx);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.index.len());
            return None;
        }

        let value = match self.slots[idx].as_mut() {
            Some(slot) => {
                slot.entry.touch();
                slot.entry.value.clone()
            }
            None => {
                self.stats.record_miss();
                return None;
            }
        };
        self.recency.move_to_front(idx);
        self.stats.record_hit();
        Some(value)
    }

    // == Erase ==
    /// Removes an entry by key. Removing an absent key is a no-op;
    /// returns whether the key was present.
    pub fn erase(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.remove_slot(idx);
                self.stats.set_total_entries(self.index.len());
                true
            }
            None => false,
        }
    }

    // == Contains ==
    /// Checks for a key without touching recency or TTL state.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Dump ==
    /// Returns all keys from the MRU end to the LRU end, for diagnostics
    /// after recovery and for tests.
    pub fn keys_mru_to_lru(&self) -> Vec<String> {
        self.recency
            .iter()
            .filter_map(|idx| self.slots[idx].as_ref().map(|slot| slot.key.clone()))
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == TTL ==
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    // == Internal Helpers ==

    /// True when the slot's entry has outlived the TTL. Elapsed time
    /// exactly equal to the TTL is not expiration; only strictly greater.
    fn slot_expired(&self, idx: usize) -> bool {
        if self.ttl_seconds <= 0 {
            return false;
        }
        match self.slots[idx].as_ref() {
            Some(slot) => slot.entry.age() > Duration::from_secs(self.ttl_seconds as u64),
            None => false,
        }
    }

    /// Places a fresh entry at the MRU position and indexes it.
    fn insert_fresh(&mut self, key: String, value: String) {
        let slot = Slot {
            key: key.clone(),
            entry: Entry::new(value),
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.recency.push_front(idx);
        self.stats.set_total_entries(self.index.len());
    }

    /// Removes the LRU entry and returns its key.
    fn evict_lru(&mut self) -> Option<String> {
        let idx = self.recency.pop_back()?;
        let slot = self.slots[idx].take()?;
        self.index.remove(&slot.key);
        self.free.push(idx);
        self.stats.record_eviction();
        Some(slot.key)
    }

    /// Unlinks and frees a slot and its index mapping.
    fn remove_slot(&mut self, idx: usize) {
        self.recency.unlink(idx);
        if let Some(slot) = self.slots[idx].take() {
            self.index.remove(&slot.key);
        }
        self.free.push(idx);
    }
}
