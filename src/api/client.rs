//! HTTP client for the Stripe API.
//!
//! This module provides [`StripeClient`], the [`BillingApi`] implementation
//! that talks to Stripe over HTTPS.

use std::collections::HashMap;

use reqwest::Method;

use crate::api::{ApiError, BillingApi, Form, FormParams, RemoteResource};
use crate::config::{ApiKey, ProviderConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Stripe API.
///
/// The client handles:
/// - Bearer authentication with the configured API key
/// - Default headers including `User-Agent` and `Stripe-Version`
/// - Form encoding of params (query string for `GET`, body otherwise)
/// - Mapping non-2xx responses to [`ApiError`]
///
/// Requests are never retried. When Stripe marks a failed request as safe
/// to retry, the hint is logged and the error is returned as-is.
///
/// # Thread Safety
///
/// `StripeClient` is `Send + Sync`, and is shared between resource handlers
/// behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use stripe_provider::{ApiKey, ProviderConfig};
/// use stripe_provider::api::{BillingApi, Product, ProductParams, StripeClient};
///
/// let config = ProviderConfig::builder()
///     .api_key(ApiKey::new("sk_test_123").unwrap())
///     .build()
///     .unwrap();
/// let client = StripeClient::new(&config)?;
///
/// let params = ProductParams {
///     name: Some("Widget".to_string()),
///     ..Default::default()
/// };
/// let product: Product = client.create::<Product>(&params).await?;
/// ```
#[derive(Debug)]
pub struct StripeClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// The bearer credential.
    api_key: ApiKey,
    /// Base URL without a trailing slash (e.g., `https://api.stripe.com`).
    base_url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify StripeClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StripeClient>();
};

impl StripeClient {
    /// Creates a new client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot be
    /// built (for example, when TLS initialization fails).
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}terraform-provider-stripe v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Stripe-Version".to_string(),
            config.api_version().to_string(),
        );

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            api_key: config.api_key().clone(),
            base_url: config.base_url().as_ref().to_string(),
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends one request and returns the raw body of a 2xx response.
    async fn send<R: RemoteResource>(
        &self,
        method: Method,
        path: &str,
        form: &Form,
        id: Option<&str>,
    ) -> Result<String, ApiError> {
        let encoded = form.encode();
        let url = if method == Method::GET && !encoded.is_empty() {
            format!("{}{path}?{encoded}", self.base_url)
        } else {
            format!("{}{path}", self.base_url)
        };

        tracing::debug!(method = %method, path, resource = R::NAME, "sending Stripe request");

        let mut req_builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(self.api_key.as_ref());
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if method == Method::POST {
            req_builder = req_builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(encoded);
        }

        let res = req_builder.send().await?;

        let status = res.status();
        let header = |name: &str| {
            res.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let request_id = header("Request-Id");
        let should_retry = header("Stripe-Should-Retry");
        let body_text = res.text().await?;

        if status.is_success() {
            return Ok(body_text);
        }

        if should_retry.as_deref() == Some("true") {
            tracing::warn!(
                status = status.as_u16(),
                request_id = request_id.as_deref().unwrap_or_default(),
                "Stripe reported {method} {path} as retryable; not retrying"
            );
        }

        let body = serde_json::from_str(&body_text)
            .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }));

        Err(ApiError::from_http_response(
            status.as_u16(),
            &body,
            R::NAME,
            id,
            request_id.as_deref(),
        ))
    }

    fn decode<R: RemoteResource>(body: &str) -> Result<R, ApiError> {
        serde_json::from_str(body).map_err(|source| ApiError::Decode {
            resource: R::NAME,
            source,
        })
    }
}

impl BillingApi for StripeClient {
    async fn create<R: RemoteResource>(&self, params: &R::Params) -> Result<R, ApiError> {
        let body = self
            .send::<R>(Method::POST, &R::collection_path(), &params.to_form(), None)
            .await?;
        Self::decode(&body)
    }

    async fn get<R: RemoteResource>(&self, id: &str, params: &R::Params) -> Result<R, ApiError> {
        let body = self
            .send::<R>(Method::GET, &R::object_path(id), &params.to_form(), Some(id))
            .await?;
        Self::decode(&body)
    }

    async fn update<R: RemoteResource>(
        &self,
        id: &str,
        params: &R::Params,
    ) -> Result<R, ApiError> {
        let body = self
            .send::<R>(Method::POST, &R::object_path(id), &params.to_form(), Some(id))
            .await?;
        Self::decode(&body)
    }

    async fn delete<R: RemoteResource>(&self, id: &str) -> Result<(), ApiError> {
        self.send::<R>(Method::DELETE, &R::object_path(id), &Form::new(), Some(id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiVersion, BaseUrl};

    fn config() -> ProviderConfig {
        ProviderConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_headers_pin_api_version() {
        let client = StripeClient::new(&config()).unwrap();
        assert_eq!(
            client.default_headers().get("Stripe-Version"),
            Some(&ApiVersion::PINNED.to_string())
        );
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_user_agent_includes_prefix() {
        let config = ProviderConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .user_agent_prefix("Pipeline/1.0")
            .build()
            .unwrap();
        let client = StripeClient::new(&config).unwrap();
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Pipeline/1.0 | terraform-provider-stripe v"));
    }

    #[test]
    fn test_debug_output_masks_api_key() {
        let client = StripeClient::new(&config()).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk_test_123"));
    }

    #[test]
    fn test_base_url_override() {
        let config = ProviderConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .base_url(BaseUrl::new("http://localhost:12111").unwrap())
            .build()
            .unwrap();
        let client = StripeClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:12111");
    }
}
