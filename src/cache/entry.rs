//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value together with the instant it was last touched.
///
/// The timestamp uses the monotonic clock: expiration is measured against
/// elapsed time, never wall-clock time. Every successful access refreshes
/// it, so the TTL is a sliding window.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored value
    pub value: String,
    /// Instant of the last successful put or get that touched this entry
    pub last_touched: Instant,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry touched now.
    pub fn new(value: String) -> Self {
        Self {
            value,
            last_touched: Instant::now(),
        }
    }

    // == Touch ==
    /// Refreshes the last-touched instant to now.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    // == Age ==
    /// Returns the time elapsed since the entry was last touched.
    pub fn age(&self) -> Duration {
        self.last_touched.elapsed()
    }
}
