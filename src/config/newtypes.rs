//! Validated newtype wrappers for configuration values.
//!
//! Each wrapper checks its contents on construction so that invalid values
//! are rejected with a clear message before the provider talks to Stripe.

use crate::error::ConfigError;
use std::fmt;

/// A validated Stripe API key.
///
/// The key is a bearer credential, so the `Debug` implementation masks it,
/// displaying only `ApiKey(*****)`.
///
/// # Example
///
/// ```rust
/// use stripe_provider::ApiKey;
///
/// let key = ApiKey::new("sk_test_123").unwrap();
/// assert_eq!(key.as_ref(), "sk_test_123");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    /// Returns `true` for test-mode keys (`sk_test_...` or `rk_test_...`).
    #[must_use]
    pub fn is_test_mode(&self) -> bool {
        self.0.starts_with("sk_test_") || self.0.starts_with("rk_test_")
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated API base URL.
///
/// Defaults to `https://api.stripe.com`. Overriding it is useful for
/// pointing the provider at a proxy or a local mock server.
///
/// # Example
///
/// ```rust
/// use stripe_provider::BaseUrl;
///
/// let url = BaseUrl::new("http://localhost:12111/").unwrap();
/// assert_eq!(url.as_ref(), "http://localhost:12111");
/// assert_eq!(url.scheme(), "http");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// The production Stripe API.
    pub const STRIPE: &'static str = "https://api.stripe.com";

    /// Creates a new validated base URL, trimming any trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not use the
    /// `http` or `https` scheme or has no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let host_end = host.find(['/', '?', '#']).unwrap_or(host.len());
        if host[..host_end].is_empty() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self(url))
    }

    /// Returns the URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.split_once("://").map_or("", |(scheme, _)| scheme)
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(Self::STRIPE.to_string())
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
        assert!(matches!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_masks_value_in_debug() {
        let key = ApiKey::new("sk_live_super_secret").unwrap();
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, "ApiKey(*****)");
        assert!(!debug_output.contains("super_secret"));
    }

    #[test]
    fn test_api_key_test_mode_detection() {
        assert!(ApiKey::new("sk_test_abc").unwrap().is_test_mode());
        assert!(ApiKey::new("rk_test_abc").unwrap().is_test_mode());
        assert!(!ApiKey::new("sk_live_abc").unwrap().is_test_mode());
    }

    #[test]
    fn test_base_url_defaults_to_stripe() {
        assert_eq!(BaseUrl::default().as_ref(), "https://api.stripe.com");
    }

    #[test]
    fn test_base_url_validates_format() {
        let url = BaseUrl::new("https://proxy.example.com/stripe/").unwrap();
        assert_eq!(url.as_ref(), "https://proxy.example.com/stripe");
        assert_eq!(url.scheme(), "https");

        assert!(BaseUrl::new("api.stripe.com").is_err());
        assert!(BaseUrl::new("ftp://api.stripe.com").is_err());
        assert!(BaseUrl::new("https://").is_err());
    }
}
