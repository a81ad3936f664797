//! The provider root.
//!
//! [`Provider`] turns practitioner configuration into a shared
//! [`StripeClient`] and hands out [`ResourceHandler`]s that use it.
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::provider::{ConfigureRequest, Provider};
//! use stripe_provider::types::{Attr, ObjectWriter};
//!
//! let provider = Provider::new("1.0.0");
//! let config = ObjectWriter::new()
//!     .attr("api_key", Attr::Value("sk_test_123".to_string()))
//!     .finish();
//!
//! let response = provider.configure(ConfigureRequest {
//!     config: Attr::Value(config),
//! });
//! assert!(response.diagnostics.is_empty());
//!
//! let configured = response.provider.unwrap();
//! assert!(configured.resource("stripe_coupon").is_some());
//! assert!(configured.resource("stripe_customer").is_none());
//! ```

use std::sync::Arc;

use crate::api::StripeClient;
use crate::config::{ApiVersion, BaseUrl, ProviderConfig};
use crate::resources::ResourceHandler;
use crate::types::{read_object, Attr, AttrValue, AttributePath, Diagnostics, DynamicValue, ObjectWriter, Value};

/// The provider's type name prefix.
pub const TYPE_NAME: &str = "stripe";

/// Provider-level configuration attributes.
#[derive(Clone, Debug, Default, PartialEq)]
struct ProviderModel {
    api_key: Attr<String>,
}

impl AttrValue for ProviderModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            api_key: r.attr("api_key"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new().attr("api_key", self.api_key).finish()
    }
}

/// Request to configure the provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigureRequest {
    /// The provider block, which may contain unknown values.
    pub config: DynamicValue,
}

/// Response to a [`ConfigureRequest`].
#[derive(Debug, Default)]
pub struct ConfigureResponse {
    /// Problems encountered.
    pub diagnostics: Diagnostics,
    /// The configured provider, absent whenever `diagnostics` has an error.
    pub provider: Option<ConfiguredProvider>,
}

/// The Stripe provider, before configuration.
///
/// Settings other than the API key are not exposed to practitioners; they
/// exist so that hosts and tests can point the provider elsewhere.
#[derive(Clone, Debug, Default)]
pub struct Provider {
    version: String,
    api_version: Option<ApiVersion>,
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
}

impl Provider {
    /// Creates a provider reporting `version`.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Overrides the `Stripe-Version` sent with every request.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sends requests to `url` instead of Stripe.
    #[must_use]
    pub fn with_base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Prefixes the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Returns the provider version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the resource type names this provider serves.
    #[must_use]
    pub const fn resource_types(&self) -> [&'static str; 4] {
        ResourceHandler::<StripeClient>::TYPE_NAMES
    }

    /// Validates configuration and builds the shared API client.
    ///
    /// `api_key` falls back to the `STRIPE_API_KEY` environment variable.
    pub fn configure(&self, req: ConfigureRequest) -> ConfigureResponse {
        self.configure_with(req, |name| std::env::var(name).ok())
    }

    /// Like [`configure`](Self::configure), reading the environment through
    /// `lookup`.
    pub(crate) fn configure_with(
        &self,
        req: ConfigureRequest,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> ConfigureResponse {
        let mut response = ConfigureResponse::default();
        let api_key_path = AttributePath::root("api_key");

        let model: Attr<ProviderModel> =
            Attr::from_dynamic(&req.config, &AttributePath::empty(), &mut response.diagnostics);
        if response.diagnostics.has_error() {
            return response;
        }
        let api_key = model.into_value().unwrap_or_default().api_key;

        if api_key.is_unknown() {
            response.diagnostics.add_attribute_error(
                api_key_path,
                "Unknown Stripe API key",
                "The Stripe API key must be set.",
            );
            return response;
        }

        let key = match ProviderConfig::resolve_api_key_with(api_key.value().map(String::as_str), lookup) {
            Ok(key) => key,
            Err(err) => {
                tracing::debug!(error = %err, "no Stripe API key available");
                response.diagnostics.add_attribute_error(
                    api_key_path,
                    "Missing Stripe API key",
                    "The Stripe API key must be set.",
                );
                return response;
            }
        };
        let test_mode = key.is_test_mode();

        let mut builder = ProviderConfig::builder().api_key(key);
        if let Some(version) = &self.api_version {
            builder = builder.api_version(version.clone());
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(prefix) = &self.user_agent_prefix {
            builder = builder.user_agent_prefix(prefix.clone());
        }
        let config = match builder.build() {
            Ok(config) => config,
            Err(err) => {
                response
                    .diagnostics
                    .add_error("Invalid Provider Configuration", err.to_string());
                return response;
            }
        };

        let client = match StripeClient::new(&config) {
            Ok(client) => client,
            Err(err) => {
                response.diagnostics.add_error(
                    "Unable to Create Stripe Client",
                    format!("An unexpected error occurred when creating the Stripe client: {err}"),
                );
                return response;
            }
        };

        tracing::debug!(
            provider_version = %self.version,
            base_url = client.base_url(),
            test_mode,
            "configured Stripe client"
        );
        response.provider = Some(ConfiguredProvider {
            client: Arc::new(client),
        });
        response
    }
}

/// A configured provider, sharing one client between its resources.
#[derive(Clone, Debug)]
pub struct ConfiguredProvider {
    client: Arc<StripeClient>,
}

// Verify ConfiguredProvider is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfiguredProvider>();
};

impl ConfiguredProvider {
    /// Returns the handler for `type_name`, or `None` if the type is not
    /// served by this provider.
    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<ResourceHandler> {
        ResourceHandler::new(type_name, Arc::clone(&self.client))
    }

    /// Returns the shared API client.
    #[must_use]
    pub fn client(&self) -> &Arc<StripeClient> {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Attr<String>) -> ConfigureRequest {
        ConfigureRequest {
            config: Attr::Value(ProviderModel { api_key }.into_value()),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_configure_with_explicit_key() {
        let response = Provider::new("test")
            .configure_with(config(Attr::Value("sk_test_123".to_string())), no_env);
        assert!(response.diagnostics.is_empty());
        assert!(response.provider.is_some());
    }

    #[test]
    fn test_configure_falls_back_to_environment() {
        let response = Provider::new("test").configure_with(config(Attr::Null), |name| {
            assert_eq!(name, "STRIPE_API_KEY");
            Some("sk_test_env".to_string())
        });
        assert!(response.diagnostics.is_empty());
        assert!(response.provider.is_some());
    }

    #[test]
    fn test_configure_null_block_uses_environment() {
        let response = Provider::new("test").configure_with(
            ConfigureRequest { config: Attr::Null },
            |_| Some("sk_test_env".to_string()),
        );
        assert!(response.provider.is_some());
    }

    #[test]
    fn test_configure_rejects_unknown_key() {
        let response = Provider::new("test").configure_with(config(Attr::Unknown), |_| {
            Some("sk_test_env".to_string())
        });
        assert!(response.provider.is_none());
        let diag = response.diagnostics.iter().next().unwrap();
        assert_eq!(diag.summary, "Unknown Stripe API key");
        assert_eq!(diag.detail, "The Stripe API key must be set.");
        assert_eq!(diag.path, Some(AttributePath::root("api_key")));
    }

    #[test]
    fn test_configure_rejects_missing_key() {
        let response = Provider::new("test").configure_with(config(Attr::Null), no_env);
        assert!(response.provider.is_none());
        let diag = response.diagnostics.iter().next().unwrap();
        assert_eq!(diag.summary, "Missing Stripe API key");
    }

    #[test]
    fn test_configure_treats_empty_key_as_missing() {
        let response = Provider::new("test")
            .configure_with(config(Attr::Value(String::new())), |_| Some(String::new()));
        assert!(response.provider.is_none());
        assert!(response.diagnostics.has_error());
    }

    #[test]
    fn test_configured_provider_serves_every_resource_type() {
        let provider = Provider::new("test");
        let configured = provider
            .configure_with(config(Attr::Value("sk_test_123".to_string())), no_env)
            .provider
            .unwrap();
        for type_name in provider.resource_types() {
            let handler = configured.resource(type_name).unwrap();
            assert_eq!(handler.type_name(), type_name);
        }
        assert!(configured.resource("stripe_customer").is_none());
    }

    #[test]
    fn test_base_url_override_reaches_client() {
        let configured = Provider::new("test")
            .with_base_url(BaseUrl::new("http://localhost:12111").unwrap())
            .with_user_agent_prefix("ci")
            .configure_with(config(Attr::Value("sk_test_123".to_string())), no_env)
            .provider
            .unwrap();
        assert_eq!(configured.client().base_url(), "http://localhost:12111");
        assert!(configured.client().default_headers()["User-Agent"].starts_with("ci | "));
    }
}
