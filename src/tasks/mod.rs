//! Background Tasks Module
//!
//! Optional tasks a host can run alongside the cache.
//!
//! # Tasks
//! - Expiry Sweep: runs the expiry sweep at a fixed interval so idle caches
//!   still shed expired entries

mod sweep;

pub use sweep::{spawn_configured_sweep, spawn_sweep_task};
