//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A missing or expired
//! entry is not an error; lookups surface that as `None` or an empty `Vec`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The envelope could not be encoded for storage
    #[error("Failed to encode cache item: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored envelope does not decode as the requested type
    #[error("Failed to decode cache item '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_key() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = CacheError::Decode {
            key: "u32:answer".to_string(),
            source,
        };
        assert!(err.to_string().contains("u32:answer"));
    }

    #[test]
    fn test_invalid_request_message() {
        let err = CacheError::InvalidRequest("Key too long".to_string());
        assert_eq!(err.to_string(), "Invalid request: Key too long");
    }
}
