//! Cache Service
//!
//! Shared, cloneable handle over a [`CacheStore`]. Every operation holds the
//! write lock for its full duration, internal sweep included, so no caller
//! can observe the keyed store and tag index out of step.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;

/// Thread-safe cache handle.
///
/// Clones share the same underlying store. Separately constructed caches
/// never share state.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    inner: Arc<RwLock<CacheStore>>,
}

impl Cache {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new cache wrapping the given store.
    pub fn with_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Creates a new cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_store(CacheStore::from_config(config))
    }

    /// Stores `value` under `key`. See [`CacheStore::save`].
    ///
    /// # Example
    /// ```
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// use tag_cache::Cache;
    ///
    /// let cache = Cache::new();
    /// cache.save("ada", &"Ada Lovelace".to_string(), None, &["people"]).await?;
    ///
    /// let name: Option<String> = cache.get("ada").await?;
    /// assert_eq!(name.as_deref(), Some("Ada Lovelace"));
    /// # Ok::<(), tag_cache::CacheError>(())
    /// # }).unwrap();
    /// ```
    pub async fn save<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        value: &T,
        expiry: Option<DateTime<Utc>>,
        tags: &[&str],
    ) -> Result<()> {
        self.inner.write().await.save(key, value, expiry, tags)
    }

    /// Retrieves the value of type `T` under `key`. See [`CacheStore::get`].
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.inner.write().await.get(key)
    }

    /// Retrieves all values of type `T` saved with `tag`. See [`CacheStore::get_by_tag`].
    pub async fn get_by_tag<T: DeserializeOwned>(&self, tag: &str) -> Result<Vec<T>> {
        self.inner.write().await.get_by_tag(tag)
    }

    /// Removes the value of type `T` under `key`. See [`CacheStore::delete`].
    pub async fn delete<T: ?Sized>(&self, key: &str) -> Result<()> {
        self.inner.write().await.delete::<T>(key)
    }

    /// Runs an expiry sweep, returning the number of entries removed.
    pub async fn sweep(&self) -> usize {
        self.inner.write().await.sweep()
    }

    /// Removes every entry and tag.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    // == Inspection ==
    // Read-only views of the physical state; these do not sweep.

    /// Returns true if an entry of type `T` is stored under `key`.
    pub async fn contains_key<T: ?Sized>(&self, key: &str) -> bool {
        self.inner.read().await.contains_key::<T>(key)
    }

    /// Returns true if `tag` has a bucket in the tag index.
    pub async fn contains_tag(&self, tag: &str) -> bool {
        self.inner.read().await.contains_tag(tag)
    }

    /// Returns the number of keys listed under `tag`.
    pub async fn tag_len(&self, tag: &str) -> usize {
        self.inner.read().await.tag_len(tag)
    }

    /// Returns the number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns true if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}
