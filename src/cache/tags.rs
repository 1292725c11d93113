//! Tag Index Module
//!
//! Secondary index from tag to the derived keys saved under it.

use std::collections::HashMap;

// == Tag Index ==
/// Maps each tag to an insertion-ordered, duplicate-free list of keys.
#[derive(Debug, Default)]
pub struct TagIndex {
    buckets: HashMap<String, Vec<String>>,
}

impl TagIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Adds `key` under `tag`. Inserting an existing pair is a no-op.
    pub fn insert(&mut self, tag: &str, key: &str) {
        let bucket = self.buckets.entry(tag.to_string()).or_default();
        if !bucket.iter().any(|k| k == key) {
            bucket.push(key.to_string());
        }
    }

    // == Remove ==
    /// Removes `key` from `tag`'s bucket, dropping the bucket once empty.
    pub fn remove(&mut self, tag: &str, key: &str) {
        if let Some(bucket) = self.buckets.get_mut(tag) {
            bucket.retain(|k| k != key);
            if bucket.is_empty() {
                self.buckets.remove(tag);
            }
        }
    }

    // == Keys ==
    /// Returns the keys listed under `tag`, empty if the tag is unknown.
    pub fn keys(&self, tag: &str) -> &[String] {
        self.buckets.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    // == Retain Keys ==
    /// Drops every key for which `keep` returns false, then drops empty buckets.
    ///
    /// Returns the number of buckets removed.
    pub fn retain_keys<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        for bucket in self.buckets.values_mut() {
            bucket.retain(|k| keep(k.as_str()));
        }
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_empty());
        before - self.buckets.len()
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.buckets.contains_key(tag)
    }

    /// Number of keys under `tag`.
    pub fn tag_len(&self, tag: &str) -> usize {
        self.keys(tag).len()
    }

    /// Number of tags in the index.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
