//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use crate::cache::MAX_KEY_LENGTH;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum caller key length in bytes
    pub max_key_length: usize,
    /// Background sweep interval in seconds, None = sweep only on access
    pub sweep_interval: Option<u64>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_KEY_LENGTH` - Maximum caller key length (default: 256)
    /// - `CACHE_SWEEP_INTERVAL` - Background sweep frequency in seconds
    ///   (default: unset; `0` also disables it)
    pub fn from_env() -> Self {
        Self {
            max_key_length: env::var("CACHE_MAX_KEY_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_KEY_LENGTH),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_key_length: MAX_KEY_LENGTH,
            sweep_interval: None,
        }
    }
}
