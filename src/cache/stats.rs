//! Cache Statistics Module
//!
//! Tracks repository outcomes: hits, misses, decode failures and writes.
//! Counters are atomic so they can be bumped through a shared reference.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Repository Stats ==
/// Live counters owned by a repository.
#[derive(Debug, Default)]
pub struct RepositoryStats {
    hits: AtomicU64,
    misses: AtomicU64,
    decode_failures: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
}

impl RepositoryStats {
    // == Constructor ==
    /// Creates a new RepositoryStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Decode Failure ==
    /// Counts a stored value that could not be decoded. Also a miss.
    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
        self.record_miss();
    }

    // == Record Write ==
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Write Failure ==
    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

// == Stats Snapshot ==
/// Plain copy of [`RepositoryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub decode_failures: u64,
    pub writes: u64,
    pub write_failures: u64,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
