//! Error types for Stripe API calls.
//!
//! HTTP status codes are mapped to semantic variants:
//!
//! - **404**: [`ApiError::NotFound`]
//! - **401 / 403**: [`ApiError::Authentication`]
//! - **400 / 402 / 409 / 422**: [`ApiError::InvalidRequest`], carrying the
//!   offending `param` when Stripe reports one
//! - **Other 4xx/5xx**: [`ApiError::Response`]
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::api::ApiError;
//! use serde_json::json;
//!
//! let error = ApiError::from_http_response(
//!     404,
//!     &json!({"error": {"type": "invalid_request_error", "message": "No such coupon: 'gold'"}}),
//!     "coupon",
//!     Some("gold"),
//!     Some("req_123"),
//! );
//! assert!(matches!(error, ApiError::NotFound { .. }));
//! ```

use thiserror::Error;

/// Error type for Stripe API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The object does not exist (HTTP 404).
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// The object type, e.g. `"coupon"`.
        resource: &'static str,
        /// The ID that was requested.
        id: String,
    },

    /// The API key was rejected (HTTP 401 or 403).
    #[error("authentication failed ({status}): {message}")]
    Authentication {
        /// The HTTP status code.
        status: u16,
        /// Stripe's error message.
        message: String,
        /// The `Request-Id` header value.
        request_id: Option<String>,
    },

    /// Stripe rejected the request parameters.
    #[error("{message}{}", .param.as_ref().map(|p| format!(" (param: {p})")).unwrap_or_default())]
    InvalidRequest {
        /// The HTTP status code.
        status: u16,
        /// Stripe's error message.
        message: String,
        /// The parameter Stripe blamed, if any.
        param: Option<String>,
        /// Stripe's machine-readable error code, if any.
        code: Option<String>,
        /// The `Request-Id` header value.
        request_id: Option<String>,
    },

    /// Any other non-2xx response.
    #[error("request failed with status {status}: {message}")]
    Response {
        /// The HTTP status code.
        status: u16,
        /// Stripe's error message, or the raw body.
        message: String,
        /// The `Request-Id` header value.
        request_id: Option<String>,
    },

    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response body did not match the expected object.
    #[error("failed to decode {resource} response: {source}")]
    Decode {
        /// The object type being decoded.
        resource: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Creates an `ApiError` from a non-2xx response.
    ///
    /// `body` is expected to follow Stripe's
    /// `{"error": {"type", "code", "message", "param"}}` shape. Anything else
    /// is reported verbatim.
    #[must_use]
    pub fn from_http_response(
        status: u16,
        body: &serde_json::Value,
        resource: &'static str,
        id: Option<&str>,
        request_id: Option<&str>,
    ) -> Self {
        let error = body.get("error");
        let field = |name: &str| {
            error
                .and_then(|e| e.get(name))
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        };
        let message = field("message").unwrap_or_else(|| body.to_string());
        let request_id = request_id.map(ToString::to_string);

        match status {
            404 => Self::NotFound {
                resource,
                id: id.unwrap_or("unknown").to_string(),
            },
            401 | 403 => Self::Authentication {
                status,
                message,
                request_id,
            },
            400 | 402 | 409 | 422 => Self::InvalidRequest {
                status,
                message,
                param: field("param"),
                code: field("code"),
                request_id,
            },
            _ => Self::Response {
                status,
                message,
                request_id,
            },
        }
    }

    /// Returns the Stripe request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Authentication { request_id, .. }
            | Self::InvalidRequest { request_id, .. }
            | Self::Response { request_id, .. } => request_id.as_deref(),
            Self::NotFound { .. } | Self::Network(_) | Self::Decode { .. } => None,
        }
    }

    /// Returns `true` if the object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
