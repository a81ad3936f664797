//! Integration tests for the `stripe_price` lifecycle.

mod common;

use common::{configured_provider, dynamic, model};
use serde_json::json;
use stripe_provider::resources::price::{PriceModel, RecurringModel};
use stripe_provider::resources::{
    CreateRequest, DeleteRequest, ImportRequest, ReadRequest, UpdateRequest,
};
use stripe_provider::types::Attr;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn price_json() -> serde_json::Value {
    json!({
        "id": "price_123",
        "object": "price",
        "active": true,
        "billing_scheme": "per_unit",
        "currency": "usd",
        "currency_options": {
            "usd": {
                "custom_unit_amount": null,
                "tax_behavior": "unspecified",
                "unit_amount": 1500,
                "unit_amount_decimal": "1500"
            }
        },
        "custom_unit_amount": null,
        "lookup_key": null,
        "metadata": {},
        "nickname": null,
        "product": "prod_123",
        "recurring": {
            "aggregate_usage": null,
            "interval": "month",
            "interval_count": 1,
            "meter": null,
            "usage_type": "licensed"
        },
        "tax_behavior": "unspecified",
        "tiers_mode": null,
        "transform_quantity": null,
        "type": "recurring",
        "unit_amount": 1500,
        "unit_amount_decimal": "1500"
    })
}

fn price_state() -> PriceModel {
    let mut diags = stripe_provider::types::Diagnostics::new();
    let mut state = PriceModel {
        id: Attr::Value("price_123".to_string()),
        ..Default::default()
    };
    let price = serde_json::from_value(price_json()).unwrap();
    stripe_provider::resources::price::populate_model(&mut state, &price, &mut diags);
    assert!(diags.is_empty());
    state
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_create_recurring_price() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/prices"))
        .and(body_string_contains("currency=usd"))
        .and(body_string_contains("product=prod_123"))
        .and(body_string_contains("recurring%5Binterval%5D=month"))
        .and(body_string_contains("unit_amount=1500"))
        .and(body_string_contains("expand%5B0%5D=currency_options"))
        .and(body_string_contains("expand%5B1%5D=tiers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(price_json()))
        .expect(1)
        .mount(&server)
        .await;

    let plan = PriceModel {
        id: Attr::Unknown,
        active: Attr::Unknown,
        currency: Attr::Value("usd".to_string()),
        product: Attr::Value("prod_123".to_string()),
        recurring: Attr::Value(RecurringModel {
            interval: Attr::Value("month".to_string()),
            ..Default::default()
        }),
        unit_amount: Attr::Value(1500),
        ..Default::default()
    };
    let handler = configured_provider(&server).resource("stripe_price").unwrap();
    let response = handler.create(CreateRequest { plan: dynamic(plan) }).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: PriceModel = model(&response.state);
    assert_eq!(state, price_state());
    assert_eq!(state.unit_amount_decimal, Attr::Value(1500.0));
}

#[tokio::test]
async fn test_read_price_with_bad_decimal_reports_conversion_error() {
    let server = MockServer::start().await;
    let mut remote = price_json();
    remote["unit_amount_decimal"] = json!("fifteen");
    Mock::given(method("GET"))
        .and(path("/v1/prices/price_123"))
        .and(query_param("expand[1]", "tiers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .mount(&server)
        .await;

    let handler = configured_provider(&server).resource("stripe_price").unwrap();
    let response = handler
        .read(ReadRequest {
            state: dynamic(price_state()),
        })
        .await;

    assert!(response.state.is_null());
    let diag = response.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Value Conversion Error");
    assert_eq!(diag.path.as_ref().unwrap().to_string(), "unit_amount_decimal");
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_archive_price() {
    let server = MockServer::start().await;
    let mut remote = price_json();
    remote["active"] = json!(false);
    remote["nickname"] = json!("Legacy");
    Mock::given(method("POST"))
        .and(path("/v1/prices/price_123"))
        .and(body_string_contains("active=false"))
        .and(body_string_contains("nickname=Legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .expect(1)
        .mount(&server)
        .await;

    let state = price_state();
    let plan = PriceModel {
        active: Attr::Value(false),
        nickname: Attr::Value("Legacy".to_string()),
        ..state.clone()
    };
    let handler = configured_provider(&server).resource("stripe_price").unwrap();
    let response = handler
        .update(UpdateRequest {
            state: dynamic(state),
            plan: dynamic(plan.clone()),
        })
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: PriceModel = model(&response.state);
    assert_eq!(state, plan);
}

// ============================================================================
// Delete / Import
// ============================================================================

#[tokio::test]
async fn test_delete_price_never_reaches_stripe() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handler = configured_provider(&server).resource("stripe_price").unwrap();
    let diags = handler
        .delete(DeleteRequest {
            state: dynamic(price_state()),
        })
        .await;

    let diag = diags.iter().next().unwrap();
    assert_eq!(diag.summary, "Client Error");
    assert_eq!(
        diag.detail,
        "Stripe API does not support deleting prices. Please archive the price instead."
    );
}

#[tokio::test]
async fn test_import_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/prices/price_123"))
        .and(query_param("expand[0]", "currency_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(price_json()))
        .mount(&server)
        .await;

    let handler = configured_provider(&server).resource("stripe_price").unwrap();
    let response = handler
        .import(ImportRequest {
            id: "price_123".to_string(),
        })
        .await;

    let state: PriceModel = model(&response.state);
    assert_eq!(state, price_state());
}
