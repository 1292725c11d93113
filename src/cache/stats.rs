//! Cache Statistics Module
//!
//! Tracks lookup hits and misses plus the work done by expiry sweeps.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that resolved a value
    pub hits: u64,
    /// Number of lookups that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries physically removed by sweeps
    pub expirations: u64,
    /// Number of sweeps run
    pub sweeps: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current number of tags in the tag index
    pub total_tags: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Sweep ==
    /// Counts one sweep and the entries it removed.
    pub fn record_sweep(&mut self, removed: usize) {
        self.sweeps += 1;
        self.expirations += removed as u64;
    }

    // == Update Sizes ==
    pub fn set_sizes(&mut self, entries: usize, tags: usize) {
        self.total_entries = entries;
        self.total_tags = tags;
    }
}
