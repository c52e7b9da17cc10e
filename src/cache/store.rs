//! Cache Store Module
//!
//! Concurrency-safe key/value storage with per-entry expiry and monotonic
//! entry ids. A single reader/writer lock guards the map and the id counter.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::cache::{Clock, ListedEntry, StoreEntry, SystemClock};

// == Store State ==
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, StoreEntry>,
    last_id: u64,
}

// == Store ==
/// In-memory TTL store shared by every request handler and the sweeper.
///
/// Every operation is total: "not found" is reported through `Option`, never
/// as an error.
#[derive(Debug)]
pub struct Store {
    state: RwLock<StoreState>,
    clock: Arc<dyn Clock>,
}

impl Store {
    // == Constructor ==
    /// Creates an empty store that reads time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            clock,
        }
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    // == Get ==
    /// Returns the value for `key` if present and unexpired.
    ///
    /// An expired entry is removed before returning `None`. The removal
    /// re-checks expiry under the write lock so a concurrent overwrite is
    /// never dropped.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let now = self.clock.now();

        {
            let state = self.state.read();
            match state.entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut state = self.state.write();
        if state
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now))
        {
            state.entries.remove(key);
        }
        None
    }

    // == Set ==
    /// Inserts or replaces `key`, expiring `ttl_seconds` from now.
    ///
    /// Returns the id assigned to the new entry.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Bytes>, ttl_seconds: u64) -> u64 {
        let now = self.clock.now();
        let mut state = self.state.write();

        state.last_id += 1;
        let id = state.last_id;
        state
            .entries
            .insert(key.into(), StoreEntry::new(id, value.into(), now, ttl_seconds));
        id
    }

    // == Sweep ==
    /// Removes every entry whose expiry is before `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self, now: i64) -> usize {
        let mut state = self.state.write();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        before - state.entries.len()
    }

    // == List ==
    /// Snapshot of every held entry, including expired ones, in no
    /// particular order.
    pub fn list(&self) -> Vec<ListedEntry> {
        let state = self.state.read();
        state
            .entries
            .iter()
            .map(|(key, entry)| ListedEntry {
                key: key.clone(),
                value: entry.value.clone(),
                id: entry.id,
            })
            .collect()
    }

    // == Length ==
    /// Number of held entries, expired ones included.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn manual_store(start: i64) -> (Store, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        (Store::new(clock.clone()), clock)
    }

    #[test]
    fn test_store_new() {
        let store = Store::default();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (store, _) = manual_store(1_000);

        store.set("k", "v1", 100);
        assert_eq!(store.get("k"), Some(Bytes::from("v1")));

        store.set("k", "v2", 100);
        assert_eq!(store.get("k"), Some(Bytes::from("v2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (store, _) = manual_store(1_000);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_zero_ttl_expires_once_time_moves() {
        let (store, clock) = manual_store(1_000);

        store.set("k", "v", 0);
        assert!(store.get("k").is_some());

        clock.advance(1);
        assert!(store.get("k").is_none());
        // Expired entry is removed as a side effect of the read.
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite_assigns_new_id() {
        let (store, _) = manual_store(1_000);

        let first = store.set("k", "v1", 100);
        let second = store.set("k", "v2", 100);

        assert!(second > first);
        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[0].value, Bytes::from("v2"));
    }

    #[test]
    fn test_store_ids_start_at_one() {
        let (store, _) = manual_store(1_000);

        assert_eq!(store.set("a", "x", 10), 1);
        assert_eq!(store.set("b", "x", 10), 2);
        assert_eq!(store.set("a", "y", 10), 3);
    }

    #[test]
    fn test_store_sweep() {
        let (store, clock) = manual_store(1_000);

        store.set("short", "v", 1);
        store.set("long", "v", 100);

        clock.advance(10);
        let removed = store.sweep(clock.now());

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
        assert!(store.get("short").is_none());

        // Idempotent
        assert_eq!(store.sweep(clock.now()), 0);
    }

    #[test]
    fn test_store_list_includes_expired() {
        let (store, clock) = manual_store(1_000);

        store.set("a", "1", 0);
        store.set("b", "2", 100);
        clock.advance(5);

        let mut keys: Vec<String> = store.list().into_iter().map(|e| e.key).collect();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_store_list_empty() {
        let store = Store::default();
        assert!(store.list().is_empty());
    }
}
