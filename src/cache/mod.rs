//! Cache Module
//!
//! In-memory memoization of calculation results: a TTL store, deterministic
//! request keys and a repository that serializes results in and out.

mod clock;
mod entry;
mod key;
mod repository;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{ListedEntry, StoreEntry};
pub use key::CacheKey;
pub use repository::{CacheRepository, CalcRepository, ListedResult};
pub use stats::{RepositoryStats, StatsSnapshot};
pub use store::Store;
