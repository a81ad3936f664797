//! Stripe API access.
//!
//! This module contains everything that touches the wire:
//!
//! - [`BillingApi`]: the capability resource handlers call
//! - [`StripeClient`]: the HTTPS implementation of [`BillingApi`]
//! - [`Form`] and [`FormParams`]: Stripe's bracket-notation form encoding
//! - Object and params types for coupons, prices, products and webhook
//!   endpoints
//! - [`ApiError`]: failures mapped from HTTP responses

mod client;
mod errors;
mod form;
mod objects;
mod resource;

pub use client::{StripeClient, SDK_VERSION};
pub use errors::ApiError;
pub use form::{field_key, Form, FormParams};
pub use objects::*;
pub use resource::{BillingApi, RemoteResource};
