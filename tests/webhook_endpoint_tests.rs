//! Integration tests for the `stripe_webhook_endpoint` lifecycle.

mod common;

use common::{configured_provider, dynamic, model};
use serde_json::json;
use stripe_provider::resources::webhook_endpoint::WebhookEndpointModel;
use stripe_provider::resources::{
    CreateRequest, DeleteRequest, ImportRequest, ReadRequest, UpdateRequest,
};
use stripe_provider::types::Attr;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "whsec_abc123";

fn endpoint_json() -> serde_json::Value {
    json!({
        "id": "we_123",
        "object": "webhook_endpoint",
        "api_version": null,
        "application": null,
        "description": "Orders",
        "enabled_events": ["charge.succeeded"],
        "metadata": {},
        "status": "enabled",
        "url": "https://example.com/hooks"
    })
}

fn endpoint_state() -> WebhookEndpointModel {
    WebhookEndpointModel {
        id: Attr::Value("we_123".to_string()),
        description: Attr::Value("Orders".to_string()),
        disabled: Attr::Value(false),
        enabled_events: Attr::Value(vec!["charge.succeeded".to_string()]),
        secret: Attr::Value(SECRET.to_string()),
        url: Attr::Value("https://example.com/hooks".to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_create_webhook_endpoint_records_secret() {
    let server = MockServer::start().await;
    let mut created = endpoint_json();
    created["secret"] = json!(SECRET);
    Mock::given(method("POST"))
        .and(path("/v1/webhook_endpoints"))
        .and(body_string_contains("url=https%3A%2F%2Fexample.com%2Fhooks"))
        .and(body_string_contains("enabled_events%5B0%5D=charge.succeeded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created))
        .expect(1)
        .mount(&server)
        .await;

    let plan = WebhookEndpointModel {
        id: Attr::Unknown,
        disabled: Attr::Unknown,
        secret: Attr::Unknown,
        ..endpoint_state()
    };
    let handler = configured_provider(&server)
        .resource("stripe_webhook_endpoint")
        .unwrap();
    let response = handler.create(CreateRequest { plan: dynamic(plan) }).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: WebhookEndpointModel = model(&response.state);
    assert_eq!(state, endpoint_state());
}

#[tokio::test]
async fn test_read_keeps_secret_and_reports_disabled() {
    let server = MockServer::start().await;
    let mut remote = endpoint_json();
    remote["status"] = json!("disabled");
    Mock::given(method("GET"))
        .and(path("/v1/webhook_endpoints/we_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .expect(1)
        .mount(&server)
        .await;

    let handler = configured_provider(&server)
        .resource("stripe_webhook_endpoint")
        .unwrap();
    let response = handler
        .read(ReadRequest {
            state: dynamic(endpoint_state()),
        })
        .await;

    let state: WebhookEndpointModel = model(&response.state);
    assert_eq!(state.secret, Attr::Value(SECRET.to_string()));
    assert_eq!(state.disabled, Attr::Value(true));
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_webhook_endpoint_events_and_status() {
    let server = MockServer::start().await;
    let mut remote = endpoint_json();
    remote["status"] = json!("disabled");
    remote["enabled_events"] = json!(["charge.succeeded", "charge.refunded"]);
    Mock::given(method("POST"))
        .and(path("/v1/webhook_endpoints/we_123"))
        .and(body_string_contains("disabled=true"))
        .and(body_string_contains("enabled_events%5B1%5D=charge.refunded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .expect(1)
        .mount(&server)
        .await;

    let state = endpoint_state();
    let plan = WebhookEndpointModel {
        disabled: Attr::Value(true),
        enabled_events: Attr::Value(vec![
            "charge.succeeded".to_string(),
            "charge.refunded".to_string(),
        ]),
        ..state.clone()
    };
    let handler = configured_provider(&server)
        .resource("stripe_webhook_endpoint")
        .unwrap();
    let response = handler
        .update(UpdateRequest {
            state: dynamic(state),
            plan: dynamic(plan.clone()),
        })
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: WebhookEndpointModel = model(&response.state);
    assert_eq!(state, plan);
}

// ============================================================================
// Delete / Import
// ============================================================================

#[tokio::test]
async fn test_delete_webhook_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/webhook_endpoints/we_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "we_123",
            "object": "webhook_endpoint",
            "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = configured_provider(&server)
        .resource("stripe_webhook_endpoint")
        .unwrap();
    let diags = handler
        .delete(DeleteRequest {
            state: dynamic(endpoint_state()),
        })
        .await;
    assert!(diags.is_empty(), "{diags:?}");
}

#[tokio::test]
async fn test_import_webhook_endpoint_has_no_secret() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/webhook_endpoints/we_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(endpoint_json()))
        .mount(&server)
        .await;

    let handler = configured_provider(&server)
        .resource("stripe_webhook_endpoint")
        .unwrap();
    let response = handler
        .import(ImportRequest {
            id: "we_123".to_string(),
        })
        .await;

    let state: WebhookEndpointModel = model(&response.state);
    assert!(state.secret.is_null());
    assert_eq!(
        state,
        WebhookEndpointModel {
            secret: Attr::Null,
            ..endpoint_state()
        }
    );
}
