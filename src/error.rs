//! Error types for provider configuration.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! bad API key or base URL is rejected before any request is made. Messages
//! are meant to be shown to practitioners as-is.
//!
//! # Example
//!
//! ```rust
//! use stripe_provider::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Stripe secret or restricted key.")]
    EmptyApiKey,

    /// Neither the configuration nor the environment supplied an API key.
    #[error("Missing Stripe API key. Set 'api_key' or the {env_var} environment variable.")]
    MissingApiKey {
        /// The environment variable that was consulted.
        env_var: &'static str,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM-DD' or 'YYYY-MM-DD.release' (e.g., '2024-09-30.acacia').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with an http or https scheme (e.g., 'https://api.stripe.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
