//! Attribute paths used to attribute diagnostics to a field.

use std::fmt;

/// One step in an [`AttributePath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathStep {
    /// A named attribute of an object.
    Attribute(String),
    /// A key of a map.
    Key(String),
    /// An index into a list.
    Index(usize),
}

/// A path from the resource root to a nested attribute.
///
/// Renders the way practitioners write it in configuration, for example
/// `currency_options["usd"].amount_off` or `tiers[0].up_to`.
///
/// # Example
///
/// ```rust
/// use stripe_provider::types::AttributePath;
///
/// let path = AttributePath::root("currency_options").key("usd").attribute("amount_off");
/// assert_eq!(path.to_string(), r#"currency_options["usd"].amount_off"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    /// Creates an empty path pointing at the resource itself.
    #[must_use]
    pub const fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Creates a path for a top-level attribute.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self::empty().attribute(name)
    }

    /// Returns a new path extended by an attribute name.
    #[must_use]
    pub fn attribute(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::Attribute(name.into()))
    }

    /// Returns a new path extended by a map key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathStep::Key(key.into()))
    }

    /// Returns a new path extended by a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    /// Returns the steps of this path.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Returns `true` if the path points at the resource itself.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::Key(key) => write!(f, "[\"{key}\"]")?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
