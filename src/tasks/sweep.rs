//! Expiry Sweep Task
//!
//! Background task that periodically sweeps expired cache entries. Every cache
//! operation already sweeps on access; this only bounds how long expired
//! entries linger in a cache nobody is touching.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::service::Cache;

/// Shortest interval the sweep task will sleep between sweeps.
const MIN_SWEEP_INTERVAL_SECS: u64 = 1;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep takes the cache's write lock like any other
/// operation.
///
/// # Arguments
/// * `cache` - Handle to the cache to sweep
/// * `interval_secs` - Interval in seconds between sweeps, raised to at least
///   one second so a zero interval cannot hold the write lock in a tight loop
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Cache::new();
/// let sweep_handle = spawn_sweep_task(cache.clone(), 30);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Cache, interval_secs: u64) -> JoinHandle<()> {
    let interval_secs = interval_secs.max(MIN_SWEEP_INTERVAL_SECS);
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep().await;

            if removed > 0 {
                info!("Background sweep: removed {} expired entries", removed);
            } else {
                debug!("Background sweep: no expired entries found");
            }
        }
    })
}

/// Spawns the sweep task if `config` enables one.
pub fn spawn_configured_sweep(cache: &Cache, config: &CacheConfig) -> Option<JoinHandle<()>> {
    config
        .sweep_interval
        .map(|interval_secs| spawn_sweep_task(cache.clone(), interval_secs))
}
