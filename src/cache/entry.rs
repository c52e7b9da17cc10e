//! Cache Entry Module
//!
//! Defines stored entries and the read-only snapshots handed out by listing.

use bytes::Bytes;

// == Store Entry ==
/// A single value held by the store.
///
/// Entries are never mutated in place: a second write to the same key
/// replaces the whole entry, including its id.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// Write sequence number, unique per store instance
    pub id: u64,
    /// Serialized payload
    pub value: Bytes,
    /// Unix timestamp (seconds) after which the entry is expired
    pub expires_at: i64,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` after `now`.
    pub fn new(id: u64, value: Bytes, now: i64, ttl_seconds: u64) -> Self {
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);

        Self {
            id,
            value,
            expires_at: now.saturating_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// The boundary second itself is still valid: an entry written with a TTL
    /// of zero is readable until the clock moves past its write second.
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

// == Listed Entry ==
/// Snapshot of one store entry at listing time, expired or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub key: String,
    pub value: Bytes,
    pub id: u64,
}
