//! Codec Module
//!
//! Encodes envelopes to JSON text for storage and decodes them back.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::cache::{CacheItem, ItemHeader};
use crate::error::{CacheError, Result};

/// Encodes an envelope into its stored text form.
pub fn encode<T: Serialize>(item: &CacheItem<T>) -> Result<String> {
    serde_json::to_string(item).map_err(CacheError::Encode)
}

/// Encodes an envelope and rejects it unless it decodes back as `CacheItem<T>`.
///
/// serde_json writes non-finite floats as `null`, which then fails to decode;
/// such values are refused here rather than stored unreadable.
pub fn encode_checked<T>(item: &CacheItem<&T>) -> Result<String>
where
    T: Serialize + DeserializeOwned,
{
    let encoded = encode(item)?;
    serde_json::from_str::<CacheItem<T>>(&encoded).map_err(CacheError::Encode)?;
    Ok(encoded)
}

/// Decodes a stored envelope as `CacheItem<T>`.
///
/// A shape mismatch between the stored value and `T` is reported as
/// [`CacheError::Decode`]; it is never coerced.
pub fn decode<T: DeserializeOwned>(key: &str, encoded: &str) -> Result<CacheItem<T>> {
    serde_json::from_str(encoded).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Decodes only the key, expiry and tags of a stored envelope.
pub fn decode_header(key: &str, encoded: &str) -> Result<ItemHeader> {
    serde_json::from_str(encoded).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Replaces the expiry of a stored envelope without decoding its value.
///
/// Unknown fields are carried over unchanged.
pub fn rewrite_expiry(key: &str, encoded: &str, expiry: DateTime<Utc>) -> Result<String> {
    let mut fields: Map<String, Value> =
        serde_json::from_str(encoded).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })?;
    let expiry = serde_json::to_value(expiry).map_err(CacheError::Encode)?;
    fields.insert("expiry".to_string(), expiry);
    serde_json::to_string(&fields).map_err(CacheError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Expiry;
    use chrono::{Duration, Utc};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u32,
    }

    #[test]
    fn test_roundtrip_with_expiry_and_tags() {
        let item = CacheItem::new(
            "Profile:1".to_string(),
            Profile {
                name: "Ada".to_string(),
                age: 36,
            },
            Some(Utc::now() + Duration::minutes(10)),
            vec!["people".to_string()],
        );
        let encoded = encode(&item).unwrap();
        let decoded: CacheItem<Profile> = decode("Profile:1", &encoded).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_encode_checked_rejects_non_finite_float() {
        let value = f64::NAN;
        let item = CacheItem::new("f64:f".to_string(), &value, None, vec![]);

        assert!(encode(&item).is_ok());
        assert!(matches!(encode_checked(&item), Err(CacheError::Encode(_))));
    }

    #[test]
    fn test_encode_checked_accepts_finite_float() {
        let value = 1.5f64;
        let item = CacheItem::new("f64:f".to_string(), &value, None, vec![]);

        let encoded = encode_checked(&item).unwrap();
        let decoded: CacheItem<f64> = decode("f64:f", &encoded).unwrap();
        assert_eq!(decoded.value, 1.5);
    }

    #[test]
    fn test_encoded_form_is_self_describing() {
        let item = CacheItem::new("u32:k".to_string(), 5u32, None, vec![]);
        let encoded = encode(&item).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["value"], 5);
        assert!(value["expiry"].is_null());
        assert!(value["tags"].is_null());
    }

    #[test]
    fn test_decode_type_mismatch_is_error() {
        let item = CacheItem::new("k".to_string(), "text".to_string(), None, vec![]);
        let encoded = encode(&item).unwrap();
        let result = decode::<Profile>("k", &encoded);
        assert!(matches!(result, Err(CacheError::Decode { ref key, .. }) if key == "k"));
    }

    #[test]
    fn test_decode_header_ignores_value_shape() {
        let expiry = Utc::now() + Duration::seconds(5);
        let item = CacheItem::new(
            "Profile:1".to_string(),
            Profile {
                name: "Ada".to_string(),
                age: 36,
            },
            Some(expiry),
            vec!["a".to_string(), "b".to_string()],
        );
        let header = decode_header("Profile:1", &encode(&item).unwrap()).unwrap();
        assert_eq!(header.key, "Profile:1");
        assert_eq!(header.expiry, Expiry::At(expiry));
        assert_eq!(header.into_tags(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_rewrite_expiry_keeps_value_and_tags() {
        let item = CacheItem::new(
            "Profile:1".to_string(),
            Profile {
                name: "Ada".to_string(),
                age: 36,
            },
            None,
            vec!["people".to_string()],
        );
        let past = Utc::now() - Duration::hours(1);

        let rewritten = rewrite_expiry("Profile:1", &encode(&item).unwrap(), past).unwrap();
        let decoded: CacheItem<Profile> = decode("Profile:1", &rewritten).unwrap();

        assert_eq!(decoded.expiry, Some(past));
        assert_eq!(decoded.value, item.value);
        assert_eq!(decoded.tags, item.tags);
    }

    #[test]
    fn test_rewrite_expiry_rejects_non_object() {
        let result = rewrite_expiry("k", "[1, 2]", Utc::now());
        assert!(matches!(result, Err(CacheError::Decode { .. })));
    }

    #[test]
    fn test_decode_header_garbage_is_error() {
        assert!(decode_header("k", "not json").is_err());
    }
}
