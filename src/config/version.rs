//! Stripe API version pinning.
//!
//! Every request carries a `Stripe-Version` header so that response shapes do
//! not drift with the account's default version. [`ApiVersion`] holds that
//! header value.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A Stripe API version such as `2024-09-30.acacia`.
///
/// Stripe versions are dated (`YYYY-MM-DD`), optionally followed by a
/// lowercase release name after a dot.
///
/// # Example
///
/// ```rust
/// use stripe_provider::ApiVersion;
///
/// let version = ApiVersion::default();
/// assert_eq!(version.to_string(), "2024-09-30.acacia");
///
/// let version: ApiVersion = "2023-10-16".parse().unwrap();
/// assert_eq!(version.date(), "2023-10-16");
/// assert_eq!(version.release(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// The version the provider's resource mappings were written against.
    pub const PINNED: &'static str = "2024-09-30.acacia";

    /// Creates a validated API version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if the string is not a
    /// dated Stripe version.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let version = version.into().trim().to_string();
        if Self::is_valid_version_format(&version) {
            Ok(Self(version))
        } else {
            Err(ConfigError::InvalidApiVersion { version })
        }
    }

    /// Returns the dated part of the version.
    #[must_use]
    pub fn date(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(date, _)| date)
    }

    /// Returns the release name, if the version has one.
    #[must_use]
    pub fn release(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, release)| release)
    }

    fn is_valid_version_format(s: &str) -> bool {
        let (date, release) = match s.split_once('.') {
            Some((date, release)) => (date, Some(release)),
            None => (s, None),
        };

        let parts: Vec<&str> = date.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return false;
        };
        let numeric = |part: &str, len: usize| {
            part.len() == len && part.chars().all(|c| c.is_ascii_digit())
        };
        if !(numeric(year, 4) && numeric(month, 2) && numeric(day, 2)) {
            return false;
        }

        release.map_or(true, |name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase())
        })
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::PINNED.to_string())
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
