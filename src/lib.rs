//! Tag Cache - an in-process, type-qualified, tag-indexed cache
//!
//! Values are stored under keys qualified by their Rust type name, can be
//! looked up by tags attached when they were saved, and expire lazily: stale
//! entries are swept whenever the cache is used rather than on a timer.

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod tasks;

pub use cache::{CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use service::Cache;
pub use tasks::{spawn_configured_sweep, spawn_sweep_task};
