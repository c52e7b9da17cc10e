//! Expiry Sweeper Task
//!
//! Background task that periodically clears expired cache entries.
//! Reads already ignore expired entries, so the sweeper only reclaims memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::CalcRepository;

/// Spawns a background task that clears expired entries out of `repository`.
///
/// The task sleeps for `interval_secs` between sweeps. Ticks are not caught
/// up: a late sweep simply leaves expired entries in memory a little longer.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let sweeper = spawn_sweeper(state.repository(), 60);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper(repository: Arc<CalcRepository>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting cache sweeper");

        loop {
            tokio::time::sleep(interval).await;
            repository.clear(repository.store().now());
        }
    })
}
