//! The tri-state attribute wrapper.
//!
//! Every attribute the orchestrator hands to a resource is either null (not
//! set), unknown (only computable after apply) or a concrete value. [`Attr`]
//! models those three states explicitly so handlers never confuse "absent"
//! with "zero".
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::types::Attr;
//!
//! let name: Attr<String> = Attr::Value("Gold".to_string());
//! assert!(!name.is_null());
//! assert_eq!(name.value().map(String::as_str), Some("Gold"));
//!
//! let computed: Attr<String> = Attr::Unknown;
//! assert!(computed.is_unknown());
//! assert_eq!(computed.value(), None);
//! ```

/// An attribute value that may be null, unknown or concrete.
///
/// `Unknown` only appears in plans. State read back from the orchestrator is
/// always either `Null` or `Value`.
///
/// Equality is structural: two `Null`s are equal, two `Unknown`s are equal,
/// and two `Value`s are equal when their payloads are. The diff engine relies
/// on exactly this comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Attr<T> {
    /// The attribute is not set.
    #[default]
    Null,
    /// The attribute will only be known after apply.
    Unknown,
    /// The attribute holds a concrete value.
    Value(T),
}

impl<T> Attr<T> {
    /// Returns `true` if the attribute is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the attribute is unknown.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns `true` if the attribute holds a concrete value.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns a reference to the concrete value, if there is one.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Consumes the attribute, returning the concrete value if there is one.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Converts `&Attr<T>` into `Attr<&T>`.
    #[must_use]
    pub const fn as_ref(&self) -> Attr<&T> {
        match self {
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
            Self::Value(value) => Attr::Value(value),
        }
    }

    /// Maps the concrete value, leaving `Null` and `Unknown` untouched.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Attr<U> {
        match self {
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
            Self::Value(value) => Attr::Value(f(value)),
        }
    }

    /// Builds an attribute from an optional value; `None` becomes `Null`.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

impl<T: Clone> Attr<T> {
    /// Returns a clone of the concrete value, if there is one.
    ///
    /// This is the request-building accessor: `Null` and `Unknown` both
    /// yield `None`, which suppresses the field in outgoing params.
    #[must_use]
    pub fn to_option(&self) -> Option<T> {
        self.value().cloned()
    }
}

impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        let attr: Attr<i64> = Attr::default();
        assert!(attr.is_null());
        assert!(!attr.is_unknown());
        assert!(!attr.is_value());
    }

    #[test]
    fn test_value_accessors() {
        let attr = Attr::Value(42_i64);
        assert_eq!(attr.value(), Some(&42));
        assert_eq!(attr.to_option(), Some(42));
        assert_eq!(attr.into_value(), Some(42));
    }

    #[test]
    fn test_null_and_unknown_have_no_value() {
        assert_eq!(Attr::<String>::Null.to_option(), None);
        assert_eq!(Attr::<String>::Unknown.to_option(), None);
    }

    #[test]
    fn test_equality_distinguishes_states() {
        assert_eq!(Attr::<String>::Null, Attr::Null);
        assert_eq!(Attr::<String>::Unknown, Attr::Unknown);
        assert_ne!(Attr::<String>::Null, Attr::Unknown);
        assert_ne!(Attr::Value(String::new()), Attr::Null);
    }

    #[test]
    fn test_map_preserves_state() {
        assert_eq!(Attr::Value(2).map(|v| v * 2), Attr::Value(4));
        assert_eq!(Attr::<i64>::Null.map(|v| v * 2), Attr::Null);
        assert_eq!(Attr::<i64>::Unknown.map(|v| v * 2), Attr::Unknown);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Attr::from_option(Some("a")), Attr::Value("a"));
        assert_eq!(Attr::<&str>::from_option(None), Attr::Null);
    }
}
