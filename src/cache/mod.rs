//! Cache Module
//!
//! Provides a type-qualified, tag-indexed cache with lazy expiry. Values are
//! stored as encoded envelopes keyed by `"{TypeName}:{key}"`.

pub mod codec;
mod entry;
mod key;
mod stats;
mod store;
mod tags;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheItem, Expiry, ItemHeader};
pub use key::{derive_key, type_prefix};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use tags::TagIndex;

// == Public Constants ==
/// Default maximum caller key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
