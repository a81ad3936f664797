//! Form encoding in Stripe's bracket notation.
//!
//! Stripe accepts `application/x-www-form-urlencoded` bodies where nesting is
//! expressed with brackets: `metadata[order]=42`, `expand[0]=currency_options`,
//! `marketing_features[0][name]=Fast`. [`Form`] collects such pairs in order
//! and [`FormParams`] is implemented by every params type.
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::api::Form;
//!
//! let mut form = Form::new();
//! form.append("name", "Gold plan");
//! form.append_list("expand", &["currency_options".to_string()]);
//! assert_eq!(form.encode(), "name=Gold%20plan&expand%5B0%5D=currency_options");
//! ```

use std::collections::BTreeMap;
use std::fmt::Display;

/// An ordered list of form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Form {
    pairs: Vec<(String, String)>,
}

impl Form {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends one field.
    pub fn append(&mut self, key: impl Into<String>, value: impl Display) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Appends a field when `value` is present.
    pub fn append_opt<V: Display>(&mut self, key: &str, value: Option<&V>) {
        if let Some(value) = value {
            self.append(key, value);
        }
    }

    /// Appends every entry of a string map as `key[entry]=value`.
    pub fn append_map(&mut self, key: &str, map: &BTreeMap<String, String>) {
        for (entry, value) in map {
            self.append(format!("{key}[{entry}]"), value);
        }
    }

    /// Appends a list as `key[0]=a&key[1]=b`.
    ///
    /// An empty list is sent as `key=`, which Stripe reads as "clear".
    pub fn append_list<V: Display>(&mut self, key: &str, list: &[V]) {
        if list.is_empty() {
            self.append(key, "");
            return;
        }
        for (i, value) in list.iter().enumerate() {
            self.append(format!("{key}[{i}]"), value);
        }
    }

    /// Appends a nested params value under `key`.
    pub fn append_nested<P: FormParams + ?Sized>(&mut self, key: &str, params: &P) {
        params.append_to(key, self);
    }

    /// Appends a list of nested params as `key[0][field]=...`.
    ///
    /// An empty list is sent as `key=`.
    pub fn append_nested_list<P: FormParams>(&mut self, key: &str, list: &[P]) {
        if list.is_empty() {
            self.append(key, "");
            return;
        }
        for (i, params) in list.iter().enumerate() {
            params.append_to(&format!("{key}[{i}]"), self);
        }
    }

    /// Appends a map of nested params as `key[entry][field]=...`.
    pub fn append_nested_map<P: FormParams>(&mut self, key: &str, map: &BTreeMap<String, P>) {
        for (entry, params) in map {
            params.append_to(&format!("{key}[{entry}]"), self);
        }
    }

    /// Returns the value of the first field named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every field in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns `true` if the form has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the form as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A request params type that can be written into a [`Form`].
pub trait FormParams {
    /// Appends this value's fields, prefixing each with `prefix`.
    ///
    /// An empty prefix means the fields are top level.
    fn append_to(&self, prefix: &str, form: &mut Form);

    /// Encodes this value as a top-level form.
    fn to_form(&self) -> Form {
        let mut form = Form::new();
        self.append_to("", &mut form);
        form
    }
}

/// Joins a prefix and a field name in bracket notation.
#[must_use]
pub fn field_key(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}[{field}]")
    }
}
