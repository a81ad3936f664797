//! Zero-value normalization between Stripe objects and attributes.
//!
//! Stripe uses a field's zero value (empty string, `0`, empty list or map)
//! to mean "not set". Configuration uses `Null` for the same thing. The
//! helpers here map one convention onto the other.
//!
//! The mapping is lossy: a value that is legitimately zero, such as a
//! `redeem_by` of `0` or an empty description, reads back as `Null`.
//! Booleans are never normalized, so `false` always stays `false`.
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::normalize::{empty_string_if_null, string_null_if_empty};
//! use stripe_provider::types::Attr;
//!
//! assert_eq!(string_null_if_empty(""), Attr::Null);
//! assert_eq!(string_null_if_empty("gold"), Attr::Value("gold".to_string()));
//!
//! // Clearing a field on update sends the empty string.
//! assert_eq!(empty_string_if_null(&Attr::Null), "");
//! ```

use std::collections::BTreeMap;

use crate::types::Attr;

/// Maps `""` to `Null`.
#[must_use]
pub fn string_null_if_empty(input: &str) -> Attr<String> {
    if input.is_empty() {
        Attr::Null
    } else {
        Attr::Value(input.to_string())
    }
}

/// Maps `0` to `Null`.
#[must_use]
pub const fn int64_null_if_empty(input: i64) -> Attr<i64> {
    if input == 0 {
        Attr::Null
    } else {
        Attr::Value(input)
    }
}

/// Maps `0.0` to `Null`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn float64_null_if_empty(input: f64) -> Attr<f64> {
    if input == 0.0 {
        Attr::Null
    } else {
        Attr::Value(input)
    }
}

/// Maps a null or empty list to `Null`.
#[must_use]
pub fn list_null_if_empty<T>(input: Attr<Vec<T>>) -> Attr<Vec<T>> {
    match input {
        Attr::Value(list) if list.is_empty() => Attr::Null,
        other => other,
    }
}

/// Maps a null or empty map to `Null`.
#[must_use]
pub fn map_null_if_empty<V>(input: Attr<BTreeMap<String, V>>) -> Attr<BTreeMap<String, V>> {
    match input {
        Attr::Value(map) if map.is_empty() => Attr::Null,
        other => other,
    }
}

/// Returns the wire value for a string attribute that changed.
///
/// A `Null` plan value becomes the empty string, which Stripe reads as
/// "clear this field".
#[must_use]
pub fn empty_string_if_null(input: &Attr<String>) -> String {
    input.value().cloned().unwrap_or_default()
}
