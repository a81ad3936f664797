//! The Stripe webhook endpoint object.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::nullable;
use crate::api::form::{field_key, Form, FormParams};
use crate::api::RemoteResource;

/// A webhook endpoint, as returned by Stripe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookEndpoint {
    /// Unique identifier.
    pub id: String,
    /// API version events are rendered with. Empty means the account default.
    #[serde(deserialize_with = "nullable")]
    pub api_version: String,
    /// ID of the Connect application that created the endpoint.
    #[serde(deserialize_with = "nullable")]
    pub application: String,
    /// Free-form description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Event types delivered to the endpoint.
    #[serde(deserialize_with = "nullable")]
    pub enabled_events: Vec<String>,
    /// Key-value metadata.
    #[serde(deserialize_with = "nullable")]
    pub metadata: BTreeMap<String, String>,
    /// Signing secret. Only returned when the endpoint is created.
    #[serde(deserialize_with = "nullable")]
    pub secret: String,
    /// `enabled` or `disabled`.
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    /// Delivery URL.
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

impl WebhookEndpoint {
    /// Returns `true` if Stripe is not delivering events to this endpoint.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.status == "disabled"
    }
}

impl RemoteResource for WebhookEndpoint {
    type Params = WebhookEndpointParams;

    const NAME: &'static str = "webhook endpoint";
    const PLURAL: &'static str = "webhook_endpoints";
}

/// Params for creating or updating a webhook endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebhookEndpointParams {
    /// API version events are rendered with. Only honoured on create.
    pub api_version: Option<String>,
    /// Free-form description. `""` clears it.
    pub description: Option<String>,
    /// Whether to stop delivering events. Only honoured on update.
    pub disabled: Option<bool>,
    /// Event types delivered to the endpoint.
    pub enabled_events: Option<Vec<String>>,
    /// Metadata entries to set. An empty value deletes the key.
    pub metadata: BTreeMap<String, String>,
    /// Delivery URL.
    pub url: Option<String>,
    /// Response fields to expand.
    pub expand: Vec<String>,
}

impl WebhookEndpointParams {
    /// Sets one metadata entry.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Requests expansion of a response field.
    pub fn add_expand(&mut self, field: impl Into<String>) {
        self.expand.push(field.into());
    }
}

impl FormParams for WebhookEndpointParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("api_version"), self.api_version.as_ref());
        form.append_opt(&key("description"), self.description.as_ref());
        form.append_opt(&key("disabled"), self.disabled.as_ref());
        if let Some(events) = &self.enabled_events {
            form.append_list(&key("enabled_events"), events);
        }
        form.append_map(&key("metadata"), &self.metadata);
        form.append_opt(&key("url"), self.url.as_ref());
        if !self.expand.is_empty() {
            form.append_list(&key("expand"), &self.expand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_status() {
        let endpoint: WebhookEndpoint = serde_json::from_str(
            r#"{"id": "we_1", "status": "disabled", "url": "https://example.com/hook", "api_version": null}"#,
        )
        .unwrap();
        assert!(endpoint.is_disabled());
        assert_eq!(endpoint.api_version, "");
        assert_eq!(endpoint.secret, "");
    }

    #[test]
    fn test_encodes_enabled_events_and_clear() {
        let params = WebhookEndpointParams {
            description: Some(String::new()),
            disabled: Some(true),
            enabled_events: Some(vec!["charge.succeeded".to_string(), "charge.failed".to_string()]),
            ..Default::default()
        };
        let form = params.to_form();
        assert_eq!(form.get("description"), Some(""));
        assert_eq!(form.get("disabled"), Some("true"));
        assert_eq!(form.get("enabled_events[0]"), Some("charge.succeeded"));
        assert_eq!(form.get("enabled_events[1]"), Some("charge.failed"));
    }
}
