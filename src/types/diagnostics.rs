//! Diagnostics returned to the orchestrator.
//!
//! Handlers never return `Err` to the orchestrator. Every problem, from a
//! malformed attribute to a rejected API call, is recorded as a
//! [`Diagnostic`] in the response's [`Diagnostics`] collection. A response
//! whose diagnostics contain an error carries no state.
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::types::{AttributePath, Diagnostics};
//!
//! let mut diags = Diagnostics::new();
//! diags.add_attribute_error(
//!     AttributePath::root("api_key"),
//!     "Missing Stripe API key",
//!     "The Stripe API key must be set.",
//! );
//! assert!(diags.has_error());
//! ```

use std::fmt;

use crate::types::AttributePath;

/// How severe a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The operation failed.
    Error,
    /// The operation succeeded but something deserves attention.
    Warning,
}

/// A single user-facing problem report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the problem.
    pub severity: Severity,
    /// A short summary, e.g. `"Client Error"`.
    pub summary: String,
    /// A longer explanation.
    pub detail: String,
    /// The attribute the problem relates to, if any.
    pub path: Option<AttributePath>,
}

impl Diagnostic {
    /// Returns `true` if this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) if !path.is_empty() => {
                write!(f, "{}: {} ({path})", self.summary, self.detail)
            }
            _ => write!(f, "{}: {}", self.summary, self.detail),
        }
    }
}

/// An ordered collection of diagnostics accumulated during one call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records an error that is not tied to a specific attribute.
    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Error, summary, detail, None);
    }

    /// Records an error attributed to `path`.
    pub fn add_attribute_error(
        &mut self,
        path: AttributePath,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(Severity::Error, summary, detail, Some(path));
    }

    /// Records a warning that is not tied to a specific attribute.
    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Warning, summary, detail, None);
    }

    /// Moves every diagnostic from `other` into this collection.
    pub fn append(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Returns `true` if any recorded diagnostic is an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Returns the number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the recorded diagnostics in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Iterates over the recorded errors only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.is_error())
    }

    fn push(
        &mut self,
        severity: Severity,
        summary: impl Into<String>,
        detail: impl Into<String>,
        path: Option<AttributePath>,
    ) {
        self.entries.push(Diagnostic {
            severity,
            summary: summary.into(),
            detail: detail.into(),
            path,
        });
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
