//! Cache Entry Module
//!
//! Defines the envelope stored for every cached value, carrying its expiry
//! and tags next to the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// == Cache Item ==
/// Envelope wrapping a cached value with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheItem<T> {
    /// Derived storage key
    pub key: String,
    /// The cached payload
    pub value: T,
    /// Expiration instant, None = never expires
    pub expiry: Option<DateTime<Utc>>,
    /// Tags supplied when the item was saved
    pub tags: Option<Vec<String>>,
}

impl<T> CacheItem<T> {
    // == Constructor ==
    /// Creates a new envelope. An empty tag list is stored as `None`.
    pub fn new(
        key: String,
        value: T,
        expiry: Option<DateTime<Utc>>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            key,
            value,
            expiry,
            tags: if tags.is_empty() { None } else { Some(tags) },
        }
    }

    // == Is Expired ==
    /// Checks if the item is expired at `now`.
    ///
    /// Boundary condition: an item is expired when `now` is greater than or
    /// equal to its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expiry, Some(expiry) if expiry <= now)
    }

    /// Returns the item's tags, empty when none were given.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

// == Expiry ==
/// Expiry as read back from an encoded envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    #[default]
    Never,
    At(DateTime<Utc>),
    /// Present but not a valid timestamp
    Malformed,
}

impl Expiry {
    /// Malformed expiries count as expired so they are never kept forever.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Expiry::Never => false,
            Expiry::At(expiry) => *expiry <= now,
            Expiry::Malformed => true,
        }
    }
}

// == Item Header ==
/// Value-agnostic view of an envelope, decodable without knowing `T`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemHeader {
    pub key: String,
    #[serde(default, deserialize_with = "lenient_expiry")]
    pub expiry: Expiry,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl ItemHeader {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_expired_at(now)
    }

    pub fn into_tags(self) -> Vec<String> {
        self.tags.unwrap_or_default()
    }
}

fn lenient_expiry<'de, D>(deserializer: D) -> Result<Expiry, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => Expiry::Never,
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|ts| Expiry::At(ts.with_timezone(&Utc)))
            .unwrap_or(Expiry::Malformed),
        Some(_) => Expiry::Malformed,
    })
}
