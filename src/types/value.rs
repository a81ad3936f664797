//! Dynamic attribute values and their conversion to typed models.
//!
//! The orchestrator exchanges resource data as untyped trees of attribute
//! values. [`Value`] is the closed set of kinds such a tree can hold, and
//! [`AttrValue`] converts between a kind and the Rust type a model uses for
//! it. Conversion never stops at the first problem: every mismatch is
//! recorded as a diagnostic attributed to its [`AttributePath`], and the
//! offending field reads as `Null`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use stripe_provider::types::{Attr, AttributePath, Diagnostics, DynamicValue, Value};
//!
//! let mut diags = Diagnostics::new();
//! let raw: DynamicValue = Attr::Value(Value::String("usd".to_string()));
//! let currency: Attr<String> = Attr::from_dynamic(&raw, &AttributePath::root("currency"), &mut diags);
//! assert_eq!(currency, Attr::Value("usd".to_string()));
//!
//! let wrong: DynamicValue = Attr::Value(Value::Bool(true));
//! let currency: Attr<String> = Attr::from_dynamic(&wrong, &AttributePath::root("currency"), &mut diags);
//! assert!(currency.is_null());
//! assert!(diags.has_error());
//! ```

use std::collections::BTreeMap;

use crate::types::{Attr, AttributePath, Diagnostics};

/// A dynamic attribute, as exchanged with the orchestrator.
pub type DynamicValue = Attr<Value>;

/// The kinds of value an attribute can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A UTF-8 string.
    String(String),
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int64(i64),
    /// A 64-bit float.
    Float64(f64),
    /// An ordered list of elements.
    List(Vec<DynamicValue>),
    /// An unordered set of elements.
    Set(Vec<DynamicValue>),
    /// A map from string keys to elements of one kind.
    Map(BTreeMap<String, DynamicValue>),
    /// An object with named, individually typed fields.
    Object(BTreeMap<String, DynamicValue>),
}

impl Value {
    /// Returns a human-readable name for this value's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }
}

/// Conversion between a dynamic [`Value`] and a typed model field.
pub trait AttrValue: Sized {
    /// The kind name used in conversion errors.
    const KIND: &'static str;

    /// Converts a concrete dynamic value.
    ///
    /// Returns `Attr::Null` after recording a diagnostic when the value has
    /// the wrong shape, and `Attr::Unknown` when a collection contains
    /// unknown elements.
    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self>;

    /// Converts back into a dynamic value.
    fn into_value(self) -> Value;
}

impl<T: AttrValue> Attr<T> {
    /// Reads a typed attribute out of a dynamic one.
    pub fn from_dynamic(value: &DynamicValue, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        match value {
            Attr::Null => Self::Null,
            Attr::Unknown => Self::Unknown,
            Attr::Value(value) => T::from_value(value, path, diags),
        }
    }

    /// Converts a typed attribute into a dynamic one.
    #[must_use]
    pub fn into_dynamic(self) -> DynamicValue {
        self.map(T::into_value)
    }
}

fn kind_mismatch<T>(
    expected: &str,
    got: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Attr<T> {
    diags.add_attribute_error(
        path.clone(),
        "Value Conversion Error",
        format!("Expected a {expected} value, got {}.", got.kind()),
    );
    Attr::Null
}

impl AttrValue for String {
    const KIND: &'static str = "string";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        match value {
            Value::String(s) => Attr::Value(s.clone()),
            other => kind_mismatch(Self::KIND, other, path, diags),
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl AttrValue for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        match value {
            Value::Bool(b) => Attr::Value(*b),
            other => kind_mismatch(Self::KIND, other, path, diags),
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl AttrValue for i64 {
    const KIND: &'static str = "int64";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        match value {
            Value::Int64(n) => Attr::Value(*n),
            other => kind_mismatch(Self::KIND, other, path, diags),
        }
    }

    fn into_value(self) -> Value {
        Value::Int64(self)
    }
}

impl AttrValue for f64 {
    const KIND: &'static str = "float64";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        match value {
            Value::Float64(n) => Attr::Value(*n),
            other => kind_mismatch(Self::KIND, other, path, diags),
        }
    }

    fn into_value(self) -> Value {
        Value::Float64(self)
    }
}

/// Tracks the outcome of converting the elements of a collection.
#[derive(Default)]
struct Elements {
    failed: bool,
    unknown: bool,
}

impl Elements {
    fn read<T: AttrValue>(
        &mut self,
        element: &DynamicValue,
        path: AttributePath,
        diags: &mut Diagnostics,
    ) -> Option<T> {
        match element {
            Attr::Null => {
                diags.add_attribute_error(
                    path,
                    "Value Conversion Error",
                    "Collection elements must not be null.",
                );
                self.failed = true;
                None
            }
            Attr::Unknown => {
                self.unknown = true;
                None
            }
            Attr::Value(value) => match T::from_value(value, &path, diags) {
                Attr::Value(v) => Some(v),
                Attr::Unknown => {
                    self.unknown = true;
                    None
                }
                Attr::Null => {
                    self.failed = true;
                    None
                }
            },
        }
    }

    fn finish<C>(self, collection: C) -> Attr<C> {
        if self.failed {
            Attr::Null
        } else if self.unknown {
            Attr::Unknown
        } else {
            Attr::Value(collection)
        }
    }
}

impl<T: AttrValue> AttrValue for Vec<T> {
    const KIND: &'static str = "list";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        let (Value::List(elements) | Value::Set(elements)) = value else {
            return kind_mismatch(Self::KIND, value, path, diags);
        };
        let mut state = Elements::default();
        let items = elements
            .iter()
            .enumerate()
            .filter_map(|(i, element)| state.read::<T>(element, path.index(i), diags))
            .collect();
        state.finish(items)
    }

    fn into_value(self) -> Value {
        Value::List(
            self.into_iter()
                .map(|item| Attr::Value(item.into_value()))
                .collect(),
        )
    }
}

impl<T: AttrValue> AttrValue for BTreeMap<String, T> {
    const KIND: &'static str = "map";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        let Value::Map(entries) = value else {
            return kind_mismatch(Self::KIND, value, path, diags);
        };
        let mut state = Elements::default();
        let items = entries
            .iter()
            .filter_map(|(key, element)| {
                state
                    .read::<T>(element, path.key(key.as_str()), diags)
                    .map(|v| (key.clone(), v))
            })
            .collect();
        state.finish(items)
    }

    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, item)| (key, Attr::Value(item.into_value())))
                .collect(),
        )
    }
}

/// Reads the named fields of an object value.
///
/// Missing fields read as `Null`.
pub struct ObjectReader<'a> {
    fields: &'a BTreeMap<String, DynamicValue>,
    path: &'a AttributePath,
    diags: &'a mut Diagnostics,
}

impl ObjectReader<'_> {
    /// Reads one field.
    pub fn attr<T: AttrValue>(&mut self, name: &str) -> Attr<T> {
        let fields = self.fields;
        match fields.get(name) {
            Some(value) => Attr::from_dynamic(value, &self.path.attribute(name), self.diags),
            None => Attr::Null,
        }
    }
}

/// Reads an object value through `read`, or records a kind mismatch.
pub fn read_object<T>(
    value: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
    read: impl FnOnce(&mut ObjectReader<'_>) -> T,
) -> Attr<T> {
    let Value::Object(fields) = value else {
        return kind_mismatch("object", value, path, diags);
    };
    let mut reader = ObjectReader {
        fields,
        path,
        diags,
    };
    Attr::Value(read(&mut reader))
}

/// Builds an object value field by field.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    fields: BTreeMap<String, DynamicValue>,
}

impl ObjectWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one field.
    #[must_use]
    pub fn attr<T: AttrValue>(mut self, name: &str, value: Attr<T>) -> Self {
        self.fields.insert(name.to_string(), value.into_dynamic());
        self
    }

    /// Finishes the object.
    #[must_use]
    pub fn finish(self) -> Value {
        Value::Object(self.fields)
    }
}
