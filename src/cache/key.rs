//! Key Derivation Module
//!
//! Builds type-qualified storage keys so different value types can share a
//! caller key without colliding.

use std::any::type_name;

// == Derive Key ==
/// Builds the storage key `"{TypeName}:{caller_key}"` for values of type `T`.
///
/// The type name is the fully qualified Rust path, so two types that share a
/// short name in different modules still get distinct keys.
pub fn derive_key<T: ?Sized>(caller_key: &str) -> String {
    format!("{}{}", type_prefix::<T>(), caller_key)
}

// == Type Prefix ==
/// Returns the leading part shared by every key derived for type `T`.
pub fn type_prefix<T: ?Sized>() -> String {
    format!("{}:", type_name::<T>())
}
