//! # Stripe Provider
//!
//! A declarative-infrastructure provider for Stripe billing objects. It maps
//! four Stripe objects onto managed resources and implements their
//! create / read / update / delete / import lifecycle:
//!
//! - `stripe_coupon`
//! - `stripe_price`
//! - `stripe_product`
//! - `stripe_webhook_endpoint`
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ProviderConfig`] and [`ProviderConfigBuilder`]
//! - Validated newtypes for the API key, API version and base URL
//! - Tri-state attributes ([`types::Attr`]) with `Null`, `Unknown` and
//!   concrete values, plus conversion from untyped attribute trees
//! - Zero-value normalization between Stripe objects and attributes
//!   ([`normalize`])
//! - A form-encoding HTTPS client for the Stripe API ([`api::StripeClient`])
//! - Per-resource handlers that diff state against plan and send only the
//!   changed fields ([`resources`])
//!
//! ## Quick Start
//!
//! ```rust
//! use stripe_provider::{ApiKey, ProviderConfig};
//!
//! let config = ProviderConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Managing a Resource
//!
//! ```rust,ignore
//! use stripe_provider::provider::{ConfigureRequest, Provider};
//! use stripe_provider::resources::CreateRequest;
//!
//! let configured = Provider::new(env!("CARGO_PKG_VERSION"))
//!     .configure(ConfigureRequest { config })
//!     .provider
//!     .expect("provider configured");
//!
//! let products = configured.resource("stripe_product").unwrap();
//! let response = products.create(CreateRequest { plan }).await;
//! // response.state holds the new product, or response.diagnostics says why not
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the configured client is passed to every handler
//!   behind an `Arc`
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: the client and configuration are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **Errors as diagnostics**: lifecycle operations never panic or return
//!   `Err`; every problem is reported in their diagnostics

pub mod api;
pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod resources;
pub mod types;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, ApiVersion, BaseUrl, ProviderConfig, ProviderConfigBuilder};
pub use error::ConfigError;

pub use api::{ApiError, BillingApi, StripeClient};
pub use provider::{ConfigureRequest, ConfigureResponse, ConfiguredProvider, Provider};
pub use resources::ResourceHandler;
pub use types::{Attr, Diagnostics};
