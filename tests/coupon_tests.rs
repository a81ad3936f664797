//! Integration tests for the `stripe_coupon` lifecycle.

mod common;

use std::collections::BTreeMap;

use common::{configured_provider, dynamic, model};
use serde_json::json;
use stripe_provider::resources::coupon::{CouponCurrencyOptionModel, CouponModel};
use stripe_provider::resources::{
    CreateRequest, DeleteRequest, ImportRequest, ReadRequest, UpdateRequest,
};
use stripe_provider::types::Attr;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn currency_options(entries: &[(&str, i64, bool)]) -> Attr<BTreeMap<String, CouponCurrencyOptionModel>> {
    Attr::Value(
        entries
            .iter()
            .map(|(currency, amount_off, top_level)| {
                let option = CouponCurrencyOptionModel {
                    amount_off: Attr::Value(*amount_off),
                    top_level: Attr::Value(*top_level),
                };
                ((*currency).to_string(), option)
            })
            .collect(),
    )
}

fn coupon_json() -> serde_json::Value {
    json!({
        "id": "gold",
        "object": "coupon",
        "amount_off": 1000,
        "currency": "usd",
        "currency_options": {
            "usd": {"amount_off": 1000}
        },
        "duration": "once",
        "duration_in_months": null,
        "max_redemptions": null,
        "metadata": {},
        "name": "Gold",
        "percent_off": null,
        "redeem_by": null,
        "valid": true
    })
}

fn coupon_state() -> CouponModel {
    CouponModel {
        id: Attr::Value("gold".to_string()),
        currency_options: currency_options(&[("usd", 1000, true)]),
        duration: Attr::Value("once".to_string()),
        name: Attr::Value("Gold".to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_create_coupon_routes_top_level_currency() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/coupons"))
        .and(body_string_contains("id=gold"))
        .and(body_string_contains("amount_off=1000"))
        .and(body_string_contains("currency=usd"))
        .and(body_string_contains("expand%5B0%5D=currency_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(coupon_json()))
        .expect(1)
        .mount(&server)
        .await;

    let plan = CouponModel {
        id: Attr::Value("gold".to_string()),
        ..coupon_state()
    };
    let handler = configured_provider(&server).resource("stripe_coupon").unwrap();
    let response = handler.create(CreateRequest { plan: dynamic(plan) }).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: CouponModel = model(&response.state);
    assert_eq!(state, coupon_state());
}

#[tokio::test]
async fn test_read_coupon_expands_currency_options() {
    let server = MockServer::start().await;
    let mut remote = coupon_json();
    remote["currency_options"]["eur"] = json!({"amount_off": 900});
    Mock::given(method("GET"))
        .and(path("/v1/coupons/gold"))
        .and(query_param("expand[0]", "currency_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .expect(1)
        .mount(&server)
        .await;

    let handler = configured_provider(&server).resource("stripe_coupon").unwrap();
    let response = handler
        .read(ReadRequest {
            state: dynamic(coupon_state()),
        })
        .await;

    let state: CouponModel = model(&response.state);
    assert_eq!(
        state.currency_options,
        currency_options(&[("eur", 900, false), ("usd", 1000, true)])
    );
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_coupon_adds_currency_and_metadata() {
    let server = MockServer::start().await;
    let mut remote = coupon_json();
    remote["currency_options"]["eur"] = json!({"amount_off": 900});
    remote["metadata"] = json!({"campaign": "spring"});
    Mock::given(method("POST"))
        .and(path("/v1/coupons/gold"))
        .and(body_string_contains("currency_options%5Beur%5D%5Bamount_off%5D=900"))
        .and(body_string_contains("metadata%5Bcampaign%5D=spring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .expect(1)
        .mount(&server)
        .await;

    let state = coupon_state();
    let plan = CouponModel {
        currency_options: currency_options(&[("eur", 900, false), ("usd", 1000, true)]),
        metadata: Attr::Value([("campaign".to_string(), "spring".to_string())].into()),
        ..state.clone()
    };
    let handler = configured_provider(&server).resource("stripe_coupon").unwrap();
    let response = handler
        .update(UpdateRequest {
            state: dynamic(state),
            plan: dynamic(plan.clone()),
        })
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: CouponModel = model(&response.state);
    assert_eq!(state, plan);
}

#[tokio::test]
async fn test_update_coupon_rejected_by_stripe() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/coupons/gold"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "Received unknown parameter: duration",
                "param": "duration"
            }
        })))
        .mount(&server)
        .await;

    let state = coupon_state();
    let plan = CouponModel {
        name: Attr::Value("Platinum".to_string()),
        ..state.clone()
    };
    let handler = configured_provider(&server).resource("stripe_coupon").unwrap();
    let response = handler
        .update(UpdateRequest {
            state: dynamic(state),
            plan: dynamic(plan),
        })
        .await;

    assert!(response.state.is_null());
    let diag = response.diagnostics.iter().next().unwrap();
    assert_eq!(
        diag.detail,
        "Unable to update coupon, got error: Received unknown parameter: duration (param: duration)"
    );
}

// ============================================================================
// Delete / Import
// ============================================================================

#[tokio::test]
async fn test_delete_coupon() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/coupons/gold"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gold",
            "object": "coupon",
            "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = configured_provider(&server).resource("stripe_coupon").unwrap();
    let diags = handler
        .delete(DeleteRequest {
            state: dynamic(coupon_state()),
        })
        .await;
    assert!(diags.is_empty(), "{diags:?}");
}

#[tokio::test]
async fn test_import_coupon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/coupons/gold"))
        .and(query_param("expand[0]", "currency_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(coupon_json()))
        .mount(&server)
        .await;

    let handler = configured_provider(&server).resource("stripe_coupon").unwrap();
    let response = handler
        .import(ImportRequest {
            id: "gold".to_string(),
        })
        .await;

    let state: CouponModel = model(&response.state);
    assert_eq!(state, coupon_state());
}
