//! Shared helpers for integration tests.
//!
//! Every test runs the provider against a `wiremock` server standing in for
//! the Stripe API.

#![allow(dead_code)]

use stripe_provider::provider::{ConfigureRequest, ConfiguredProvider, Provider};
use stripe_provider::types::{Attr, AttrValue, AttributePath, Diagnostics, DynamicValue, ObjectWriter};
use stripe_provider::BaseUrl;
use wiremock::MockServer;

/// The API key every test configures.
pub const API_KEY: &str = "sk_test_123";

/// Configures a provider that sends its requests to `server`.
pub fn configured_provider(server: &MockServer) -> ConfiguredProvider {
    let config = ObjectWriter::new()
        .attr("api_key", Attr::Value(API_KEY.to_string()))
        .finish();
    let response = Provider::new("test")
        .with_base_url(BaseUrl::new(server.uri()).unwrap())
        .configure(ConfigureRequest {
            config: Attr::Value(config),
        });
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    response.provider.unwrap()
}

/// Converts a model into the dynamic form the orchestrator sends.
pub fn dynamic<M: AttrValue>(model: M) -> DynamicValue {
    Attr::Value(model.into_value())
}

/// Reads a model back out of a response state.
pub fn model<M: AttrValue>(state: &DynamicValue) -> M {
    let mut diags = Diagnostics::new();
    let model = Attr::<M>::from_dynamic(state, &AttributePath::empty(), &mut diags);
    assert!(diags.is_empty(), "{diags:?}");
    model.into_value().expect("state is a concrete object")
}
