//! Configuration types for the Stripe provider.
//!
//! # Overview
//!
//! - [`ProviderConfig`]: all settings needed to talk to Stripe
//! - [`ProviderConfigBuilder`]: a builder for [`ProviderConfig`]
//! - [`ApiKey`]: a validated API key with masked debug output
//! - [`ApiVersion`]: the pinned `Stripe-Version`
//! - [`BaseUrl`]: the API base URL, overridable for proxies and tests
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::{ApiKey, ProviderConfig};
//!
//! let config = ProviderConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_version().as_ref(), "2024-09-30.acacia");
//! assert_eq!(config.base_url().as_ref(), "https://api.stripe.com");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiKey, BaseUrl};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Environment variable consulted when `api_key` is not configured.
pub const API_KEY_ENV_VAR: &str = "STRIPE_API_KEY";

/// Configuration for the Stripe provider.
///
/// # Thread Safety
///
/// `ProviderConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    api_key: ApiKey,
    api_version: ApiVersion,
    base_url: BaseUrl,
    user_agent_prefix: Option<String>,
}

impl ProviderConfig {
    /// Creates a new builder for constructing a `ProviderConfig`.
    #[must_use]
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Resolves the API key from configuration, falling back to the
    /// [`API_KEY_ENV_VAR`] environment variable.
    ///
    /// A configured key wins over the environment. An empty key from either
    /// source counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if neither source supplies a key.
    pub fn resolve_api_key(configured: Option<&str>) -> Result<ApiKey, ConfigError> {
        Self::resolve_api_key_with(configured, |name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_api_key_with(
        configured: Option<&str>,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<ApiKey, ConfigError> {
        let key = match configured {
            Some(key) => key.to_string(),
            None => {
                tracing::debug!(env_var = API_KEY_ENV_VAR, "api_key not configured, reading environment");
                lookup(API_KEY_ENV_VAR).unwrap_or_default()
            }
        };
        ApiKey::new(key).map_err(|_| ConfigError::MissingApiKey {
            env_var: API_KEY_ENV_VAR,
        })
    }
}

// Verify ProviderConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProviderConfig>();
};

/// Builder for constructing [`ProviderConfig`] instances.
///
/// `api_key` is required.
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::PINNED`]
/// - `base_url`: [`BaseUrl::STRIPE`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
    api_key: Option<ApiKey>,
    api_version: Option<ApiVersion>,
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
}

impl ProviderConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ProviderConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set.
    pub fn build(self) -> Result<ProviderConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        Ok(ProviderConfig {
            api_key,
            api_version: self.api_version.unwrap_or_default(),
            base_url: self.base_url.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
