//! Cache Store Module
//!
//! Main cache engine combining the keyed store of encoded envelopes with the
//! tag index. Expired entries are removed lazily: every public operation runs
//! a sweep before (or, for delete, after) doing its own work.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{
    codec, derive_key, type_prefix, CacheItem, CacheStats, TagIndex, MAX_KEY_LENGTH,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Hours into the past a deleted entry's expiry is moved.
const LOGICAL_DELETE_OFFSET_HOURS: i64 = 1;

// == Cache Store ==
/// Type-qualified, tag-indexed cache storage with lazy expiry.
#[derive(Debug)]
pub struct CacheStore {
    /// Derived key -> encoded envelope
    entries: HashMap<String, String>,
    /// Tag -> derived keys
    tags: TagIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum caller key length in bytes
    max_key_length: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new, empty CacheStore.
    ///
    /// # Arguments
    /// * `max_key_length` - Maximum caller key length in bytes accepted by save
    pub fn new(max_key_length: usize) -> Self {
        Self {
            entries: HashMap::new(),
            tags: TagIndex::new(),
            stats: CacheStats::new(),
            max_key_length,
        }
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_key_length)
    }

    // == Save ==
    /// Stores `value` under `key` with an optional expiry and tags.
    ///
    /// An expiry at or before now makes this a silent no-op. Otherwise any
    /// previous entry for the same key and type is overwritten, and the key
    /// is added to each tag's bucket.
    ///
    /// Values whose encoded form would not decode back as `T` (for example a
    /// NaN float) are rejected with [`CacheError::Encode`] and nothing changes.
    ///
    /// # Arguments
    /// * `key` - Caller key, qualified by `T`'s type name before storage
    /// * `value` - The value to store
    /// * `expiry` - Optional expiration instant (UTC)
    /// * `tags` - Tags for secondary lookup via [`CacheStore::get_by_tag`]
    pub fn save<T: Serialize + DeserializeOwned>(
        &mut self,
        key: &str,
        value: &T,
        expiry: Option<DateTime<Utc>>,
        tags: &[&str],
    ) -> Result<()> {
        self.sweep();

        if key.len() > self.max_key_length {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                self.max_key_length
            )));
        }

        let cache_key = derive_key::<T>(key);

        if matches!(expiry, Some(expiry) if expiry <= Utc::now()) {
            debug!("Skipping save of '{}': expiry already passed", cache_key);
            return Ok(());
        }

        let mut unique_tags: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique_tags.iter().any(|t| t == tag) {
                unique_tags.push(tag.to_string());
            }
        }

        // Nothing is mutated until the envelope is known to decode back as `T`
        let item = CacheItem::new(cache_key.clone(), value, expiry, unique_tags);
        let encoded = codec::encode_checked(&item)?;

        if let Some(previous) = self.entries.insert(cache_key.clone(), encoded) {
            self.untag_replaced(&cache_key, &previous, item.tags());
        }

        for tag in item.tags() {
            self.tags.insert(tag, &cache_key);
        }

        debug!("Saved '{}' with {} tag(s)", cache_key, item.tags().len());
        Ok(())
    }

    /// Drops tag memberships the overwritten envelope had but the new one lacks.
    fn untag_replaced(&mut self, cache_key: &str, previous: &str, kept: &[String]) {
        match codec::decode_header(cache_key, previous) {
            Ok(header) => {
                for tag in header.into_tags() {
                    if !kept.contains(&tag) {
                        self.tags.remove(&tag, cache_key);
                    }
                }
            }
            Err(err) => warn!("Overwrote undecodable entry: {}", err),
        }
    }

    // == Get ==
    /// Retrieves the value of type `T` saved under `key`.
    ///
    /// Returns `Ok(None)` if the entry is absent or expired, and an error if
    /// the stored envelope does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        self.sweep();
        let cache_key = derive_key::<T>(key);
        self.lookup(&cache_key)
    }

    // == Get By Tag ==
    /// Retrieves every value of type `T` saved with `tag`.
    ///
    /// Keys under the tag that belong to other types are ignored, and keys
    /// that no longer resolve are skipped.
    pub fn get_by_tag<T: DeserializeOwned>(&mut self, tag: &str) -> Result<Vec<T>> {
        self.sweep();

        let prefix = type_prefix::<T>();
        let keys: Vec<String> = self
            .tags
            .keys(tag)
            .iter()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        let mut values = Vec::with_capacity(keys.len());
        for cache_key in &keys {
            if let Some(value) = self.lookup(cache_key)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Decodes the entry at a derived key, treating expired entries as absent.
    fn lookup<T: DeserializeOwned>(&mut self, cache_key: &str) -> Result<Option<T>> {
        let Some(encoded) = self.entries.get(cache_key) else {
            self.stats.record_miss();
            return Ok(None);
        };

        let item: CacheItem<T> = codec::decode(cache_key, encoded)?;
        if item.is_expired_at(Utc::now()) {
            self.stats.record_miss();
            return Ok(None);
        }

        self.stats.record_hit();
        Ok(Some(item.value))
    }

    // == Delete ==
    /// Removes the value of type `T` saved under `key`.
    ///
    /// The entry's expiry is moved into the past and the following sweep
    /// removes it together with its tag memberships. Deleting a missing key
    /// is not an error.
    pub fn delete<T: ?Sized>(&mut self, key: &str) -> Result<()> {
        let cache_key = derive_key::<T>(key);

        if let Some(encoded) = self.entries.get_mut(&cache_key) {
            let past = Utc::now() - Duration::hours(LOGICAL_DELETE_OFFSET_HOURS);
            match codec::rewrite_expiry(&cache_key, encoded.as_str(), past) {
                Ok(rewritten) => {
                    *encoded = rewritten;
                    debug!("Marked '{}' expired", cache_key);
                }
                // The sweep drops entries it cannot read, so this still removes it
                Err(err) => warn!("Deleting undecodable entry: {}", err),
            }
        }

        self.sweep();
        Ok(())
    }

    // == Sweep ==
    /// Removes all expired entries and repairs the tag index.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Utc::now())
    }

    fn sweep_at(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<(String, Vec<String>)> = self
            .entries
            .iter()
            .filter_map(|(key, encoded)| match codec::decode_header(key, encoded) {
                Ok(header) if header.is_expired_at(now) => {
                    Some((key.clone(), header.into_tags()))
                }
                Ok(_) => None,
                Err(err) => {
                    warn!("Sweeping undecodable entry: {}", err);
                    Some((key.clone(), Vec::new()))
                }
            })
            .collect();

        let removed = expired.len();

        for (key, tags) in expired {
            self.entries.remove(&key);
            for tag in &tags {
                self.tags.remove(tag, &key);
            }
        }

        // Catches tag entries whose envelope could not report its own tags
        let entries = &self.entries;
        self.tags.retain_keys(|key| entries.contains_key(key));

        self.stats.record_sweep(removed);
        if removed > 0 {
            info!("Expiry sweep: removed {} expired entries", removed);
        }
        removed
    }

    // == Inspection ==
    // These report what is physically stored and do not sweep.

    /// Returns true if an entry of type `T` is stored under `key`.
    pub fn contains_key<T: ?Sized>(&self, key: &str) -> bool {
        self.entries.contains_key(&derive_key::<T>(key))
    }

    /// Returns true if `tag` has a bucket in the tag index.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_tag(tag)
    }

    /// Returns the number of keys listed under `tag`.
    pub fn tag_len(&self, tag: &str) -> usize {
        self.tags.tag_len(tag)
    }

    /// Returns the number of tags in the tag index.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entries_for_test(&self) -> &HashMap<String, String> {
        &self.entries
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_sizes(self.entries.len(), self.tags.len());
        stats
    }

    // == Clear ==
    /// Removes every entry and tag.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tags.clear();
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(MAX_KEY_LENGTH)
    }
}
