//! Attribute types shared by every resource.
//!
//! - [`Attr`]: the null / unknown / value tri-state
//! - [`Value`] and [`DynamicValue`]: untyped attribute trees
//! - [`AttrValue`]: conversion between dynamic and typed attributes
//! - [`Diagnostics`]: the error channel back to the orchestrator

mod attr;
mod diagnostics;
mod path;
mod value;

pub use attr::Attr;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use path::{AttributePath, PathStep};
pub use value::{read_object, AttrValue, DynamicValue, ObjectReader, ObjectWriter, Value};
