//! Cache Repository Module
//!
//! Maps request/result objects onto store keys and values. Requests become
//! keys through [`CacheKey`]; results are stored as JSON.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, RepositoryStats, StatsSnapshot, Store};
use crate::error::{CacheError, Result};
use crate::models::{CalcAggregates, CalculateRequest};

/// Repository for mortgage calculation results.
pub type CalcRepository = CacheRepository<CalculateRequest, CalcAggregates>;

// == Listed Result ==
/// A decoded store entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedResult<Q, R> {
    pub id: u64,
    pub request: Q,
    pub result: R,
}

// == Cache Repository ==
/// Cache-aside access to a [`Store`] keyed by request `Q`, holding results `R`.
#[derive(Debug)]
pub struct CacheRepository<Q, R> {
    store: Arc<Store>,
    ttl: u64,
    stats: RepositoryStats,
    _types: PhantomData<fn() -> (Q, R)>,
}

impl<Q, R> CacheRepository<Q, R>
where
    Q: Serialize + DeserializeOwned,
    R: Serialize + DeserializeOwned,
{
    // == Constructor ==
    /// Creates a repository writing every entry with `ttl` seconds to live.
    pub fn new(store: Arc<Store>, ttl: u64) -> Self {
        Self {
            store,
            ttl,
            stats: RepositoryStats::new(),
            _types: PhantomData,
        }
    }

    // == Lookup ==
    /// Looks up the result cached for `request`, keeping the reason for a
    /// miss: [`CacheError::NotFound`] for absent or expired entries,
    /// [`CacheError::Decode`] for a stored value of the wrong shape.
    pub fn lookup(&self, request: &Q) -> Result<R> {
        let key = CacheKey::derive(request)?;

        let bytes = self
            .store
            .get(key.as_str())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|source| CacheError::Decode {
            key: key.into_string(),
            source,
        })
    }

    // == Get ==
    /// Returns the cached result for `request`, or `None` on any miss.
    ///
    /// Undecodable values and underivable keys count as misses so callers
    /// always fall through to computing a fresh result.
    pub fn get(&self, request: &Q) -> Option<R> {
        match self.lookup(request) {
            Ok(result) => {
                self.stats.record_hit();
                debug!(op = "repository.get", "cache hit");
                Some(result)
            }
            Err(CacheError::NotFound(key)) => {
                self.stats.record_miss();
                debug!(op = "repository.get", %key, "cache miss");
                None
            }
            Err(err @ CacheError::Decode { .. }) => {
                self.stats.record_decode_failure();
                warn!(op = "repository.get", error = %err, "discarding undecodable cache entry");
                None
            }
            Err(err) => {
                self.stats.record_miss();
                warn!(op = "repository.get", error = %err, "cache lookup failed");
                None
            }
        }
    }

    // == Set ==
    /// Stores `result` under the key derived from `request`.
    ///
    /// Returns the store id of the new entry. Callers serving a freshly
    /// computed result should log and drop the error rather than fail.
    pub fn set(&self, request: &Q, result: &R) -> Result<u64> {
        let outcome = self.encode_and_store(request, result);
        match &outcome {
            Ok(id) => {
                self.stats.record_write();
                debug!(op = "repository.set", id, "result cached");
            }
            Err(_) => self.stats.record_write_failure(),
        }
        outcome
    }

    fn encode_and_store(&self, request: &Q, result: &R) -> Result<u64> {
        let key = CacheKey::derive(request)?;
        let value = serde_json::to_vec(result).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;

        Ok(self.store.set(key.into_string(), value, self.ttl))
    }

    // == List ==
    /// Decodes every held entry, ordered by id.
    ///
    /// Fails as a whole if any single entry's key or value does not decode.
    pub fn list(&self) -> Result<Vec<ListedResult<Q, R>>> {
        let mut listed = self
            .store
            .list()
            .into_iter()
            .map(|entry| -> Result<ListedResult<Q, R>> {
                let result = serde_json::from_slice(&entry.value).map_err(|source| {
                    CacheError::Decode {
                        key: entry.key.clone(),
                        source,
                    }
                })?;
                let request = CacheKey::parse(&entry.key)?;

                Ok(ListedResult {
                    id: entry.id,
                    request,
                    result,
                })
            })
            .collect::<Result<Vec<_>>>()
            .inspect_err(|err| {
                warn!(op = "repository.list", error = %err, "failed to decode cache entries")
            })?;

        listed.sort_by_key(|entry| entry.id);
        Ok(listed)
    }

    // == Clear ==
    /// Removes entries expired at `now`. Returns how many were removed.
    pub fn clear(&self, now: i64) -> usize {
        let removed = self.store.sweep(now);
        if removed > 0 {
            info!(op = "repository.clear", removed, "deleted expired items from cache");
        } else {
            debug!(op = "repository.clear", "no expired items in cache");
        }
        removed
    }

    // == Accessors ==
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
