//! The `stripe_webhook_endpoint` resource.
//!
//! A webhook endpoint tells Stripe where to deliver events. The signing
//! `secret` is only returned when the endpoint is created, so it is written
//! to state once and carried forward from then on.
//!
//! Endpoints cannot be created disabled: `disabled = true` is rejected while
//! planning a create. Changing `api_version` replaces the endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{BillingApi, RemoteResource, StripeClient, WebhookEndpoint, WebhookEndpointParams};
use crate::normalize::{map_null_if_empty, string_null_if_empty};
use crate::resources::{
    changed_clearable, changed_list, changed_value, client_error, decode, metadata_changes,
    replace_if_changed, use_state_for_unknown, validators, CreateRequest, DeleteRequest,
    ImportRequest, ModifyPlanRequest, PlanResponse, ReadRequest, StateResponse, UpdateRequest,
    ValidateConfigRequest,
};
use crate::types::{read_object, Attr, AttrValue, AttributePath, Diagnostics, ObjectWriter, Value};

/// The orchestrator type name.
pub const TYPE_NAME: &str = "stripe_webhook_endpoint";

/// Attributes of a webhook endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WebhookEndpointModel {
    pub id: Attr<String>,
    pub api_version: Attr<String>,
    pub application: Attr<String>,
    pub description: Attr<String>,
    pub disabled: Attr<bool>,
    pub enabled_events: Attr<Vec<String>>,
    pub metadata: Attr<BTreeMap<String, String>>,
    pub secret: Attr<String>,
    pub url: Attr<String>,
}

impl AttrValue for WebhookEndpointModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            id: r.attr("id"),
            api_version: r.attr("api_version"),
            application: r.attr("application"),
            description: r.attr("description"),
            disabled: r.attr("disabled"),
            enabled_events: r.attr("enabled_events"),
            metadata: r.attr("metadata"),
            secret: r.attr("secret"),
            url: r.attr("url"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("id", self.id)
            .attr("api_version", self.api_version)
            .attr("application", self.application)
            .attr("description", self.description)
            .attr("disabled", self.disabled)
            .attr("enabled_events", self.enabled_events)
            .attr("metadata", self.metadata)
            .attr("secret", self.secret)
            .attr("url", self.url)
            .finish()
    }
}

/// Copies a webhook endpoint into the model.
///
/// `id` and `secret` are left alone: the caller sets them.
pub fn populate_model(model: &mut WebhookEndpointModel, endpoint: &WebhookEndpoint) {
    model.api_version = string_null_if_empty(&endpoint.api_version);
    model.application = string_null_if_empty(&endpoint.application);
    model.description = string_null_if_empty(&endpoint.description);
    model.enabled_events = Attr::Value(endpoint.enabled_events.clone());
    model.metadata = map_null_if_empty(Attr::Value(endpoint.metadata.clone()));
    model.disabled = Attr::Value(endpoint.is_disabled());
    model.url = Attr::Value(endpoint.url.clone());
}

/// Builds create params from a plan.
#[must_use]
pub fn build_create_params(plan: &WebhookEndpointModel) -> WebhookEndpointParams {
    WebhookEndpointParams {
        api_version: plan.api_version.to_option(),
        description: plan.description.to_option(),
        enabled_events: plan.enabled_events.to_option(),
        metadata: plan.metadata.to_option().unwrap_or_default(),
        url: plan.url.to_option(),
        ..Default::default()
    }
}

/// Builds the change-set between state and plan.
#[must_use]
pub fn build_update_params(
    state: &WebhookEndpointModel,
    plan: &WebhookEndpointModel,
) -> WebhookEndpointParams {
    WebhookEndpointParams {
        description: changed_clearable(&state.description, &plan.description),
        disabled: changed_value(&state.disabled, &plan.disabled),
        enabled_events: changed_list(&state.enabled_events, &plan.enabled_events),
        metadata: metadata_changes(&state.metadata, &plan.metadata),
        url: changed_value(&state.url, &plan.url),
        ..Default::default()
    }
}

/// Handler for `stripe_webhook_endpoint`.
#[derive(Debug)]
pub struct WebhookEndpointResource<C = StripeClient> {
    client: Arc<C>,
}

impl<C: BillingApi> WebhookEndpointResource<C> {
    /// Creates a handler that calls Stripe through `client`.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Creates a webhook endpoint and records its signing secret.
    pub async fn create(&self, req: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut plan) = decode::<WebhookEndpointModel>(&req.plan, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let params = build_create_params(&plan);
        let endpoint = match self.client.create::<WebhookEndpoint>(&params).await {
            Ok(endpoint) => endpoint,
            Err(err) => {
                client_error(&mut diags, "create", WebhookEndpoint::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        plan.id = Attr::Value(endpoint.id.clone());
        plan.secret = Attr::Value(endpoint.secret.clone());
        populate_model(&mut plan, &endpoint);

        tracing::trace!(resource = TYPE_NAME, id = %endpoint.id, "created a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Refreshes a webhook endpoint.
    pub async fn read(&self, req: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut state) = decode::<WebhookEndpointModel>(&req.state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let id = state.id.to_option().unwrap_or_default();
        match self
            .client
            .get::<WebhookEndpoint>(&id, &WebhookEndpointParams::default())
            .await
        {
            Ok(endpoint) => populate_model(&mut state, &endpoint),
            Err(err) => {
                client_error(&mut diags, "read", WebhookEndpoint::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "read a resource");
        StateResponse::from_model(state, diags)
    }

    /// Sends the changed fields of a webhook endpoint.
    pub async fn update(&self, req: UpdateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let state = decode::<WebhookEndpointModel>(&req.state, &mut diags);
        let plan = decode::<WebhookEndpointModel>(&req.plan, &mut diags);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return StateResponse::failed(diags);
        };

        let params = build_update_params(&state, &plan);
        let id = plan.id.to_option().unwrap_or_default();
        match self.client.update::<WebhookEndpoint>(&id, &params).await {
            Ok(endpoint) => populate_model(&mut plan, &endpoint),
            Err(err) => {
                client_error(&mut diags, "update", WebhookEndpoint::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "updated a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Deletes a webhook endpoint.
    pub async fn delete(&self, req: DeleteRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(state) = decode::<WebhookEndpointModel>(&req.state, &mut diags) else {
            return diags;
        };

        let id = state.id.to_option().unwrap_or_default();
        if let Err(err) = self.client.delete::<WebhookEndpoint>(&id).await {
            client_error(&mut diags, "delete", WebhookEndpoint::NAME, &err);
            return diags;
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "deleted a resource");
        diags
    }

    /// Adopts an existing webhook endpoint.
    ///
    /// Stripe never returns the secret after creation, so an imported
    /// endpoint has a `Null` secret.
    pub async fn import(&self, req: ImportRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let endpoint = match self
            .client
            .get::<WebhookEndpoint>(&req.id, &WebhookEndpointParams::default())
            .await
        {
            Ok(endpoint) => endpoint,
            Err(err) => {
                client_error(&mut diags, "import", WebhookEndpoint::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        let mut state = WebhookEndpointModel {
            id: Attr::Value(req.id.clone()),
            ..Default::default()
        };
        populate_model(&mut state, &endpoint);

        tracing::trace!(resource = TYPE_NAME, id = %req.id, "imported a resource");
        StateResponse::from_model(state, diags)
    }

    /// Rejects creating a disabled endpoint, carries computed attributes
    /// forward, and flags `api_version` changes for replacement.
    #[must_use]
    pub fn modify_plan(&self, req: ModifyPlanRequest) -> PlanResponse {
        let mut response = PlanResponse {
            plan: req.plan.clone(),
            ..Default::default()
        };
        if req.plan.is_null() {
            return response;
        }
        let Some(mut plan) = decode::<WebhookEndpointModel>(&req.plan, &mut response.diagnostics)
        else {
            return response;
        };

        if req.state.is_null() {
            if plan.disabled == Attr::Value(true) {
                response.diagnostics.add_attribute_error(
                    AttributePath::root("disabled"),
                    "Client Error",
                    "Cannot create resource with attribute set to true",
                );
            }
            return response;
        }

        let Some(state) = decode::<WebhookEndpointModel>(&req.state, &mut response.diagnostics)
        else {
            return response;
        };
        use_state_for_unknown(&state.id, &mut plan.id);
        use_state_for_unknown(&state.application, &mut plan.application);
        use_state_for_unknown(&state.secret, &mut plan.secret);
        replace_if_changed(
            &mut response.requires_replace,
            "api_version",
            &state.api_version,
            &plan.api_version,
        );

        response.plan = Attr::Value(plan.into_value());
        response
    }

    /// Checks the URL scheme, event list and metadata limits.
    #[must_use]
    pub fn validate_config(&self, req: ValidateConfigRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(config) = decode::<WebhookEndpointModel>(&req.config, &mut diags) else {
            return diags;
        };

        validators::has_prefix(
            &mut diags,
            AttributePath::root("url"),
            &config.url,
            "https://",
            "must be a valid HTTPS URL",
        );
        validators::list(
            &mut diags,
            &AttributePath::root("enabled_events"),
            &config.enabled_events,
            None,
        );
        validators::metadata(&mut diags, &config.metadata);
        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FormParams;
    use crate::resources::testing::OfflineApi;

    fn endpoint() -> WebhookEndpoint {
        WebhookEndpoint {
            id: "we_123".to_string(),
            api_version: "2024-09-30.acacia".to_string(),
            description: "Orders".to_string(),
            enabled_events: vec!["charge.succeeded".to_string()],
            metadata: BTreeMap::from([("team".to_string(), "billing".to_string())]),
            secret: "whsec_abc".to_string(),
            status: "enabled".to_string(),
            url: "https://example.com/hook".to_string(),
            ..Default::default()
        }
    }

    fn model() -> WebhookEndpointModel {
        let mut model = WebhookEndpointModel {
            id: Attr::Value("we_123".to_string()),
            secret: Attr::Value("whsec_abc".to_string()),
            ..Default::default()
        };
        populate_model(&mut model, &endpoint());
        model
    }

    #[test]
    fn test_populate_normalizes_empty_fields() {
        let mut model = WebhookEndpointModel::default();
        populate_model(
            &mut model,
            &WebhookEndpoint {
                id: "we_1".to_string(),
                status: "disabled".to_string(),
                url: "https://example.com".to_string(),
                ..Default::default()
            },
        );
        assert!(model.api_version.is_null());
        assert!(model.application.is_null());
        assert!(model.description.is_null());
        assert!(model.metadata.is_null());
        assert_eq!(model.enabled_events, Attr::Value(vec![]));
        assert_eq!(model.disabled, Attr::Value(true));
        assert!(model.id.is_null());
    }

    #[test]
    fn test_create_params_skip_null_fields() {
        let plan = WebhookEndpointModel {
            enabled_events: Attr::Value(vec!["*".to_string()]),
            url: Attr::Value("https://example.com/hook".to_string()),
            disabled: Attr::Value(false),
            api_version: Attr::Null,
            ..Default::default()
        };
        let form = build_create_params(&plan).to_form();
        assert_eq!(form.get("url"), Some("https://example.com/hook"));
        assert_eq!(form.get("enabled_events[0]"), Some("*"));
        assert_eq!(form.get("api_version"), None);
        assert_eq!(form.get("description"), None);
        assert_eq!(form.get("disabled"), None);
    }

    #[test]
    fn test_update_with_no_changes_is_empty() {
        let state = model();
        let params = build_update_params(&state, &state.clone());
        assert!(params.to_form().is_empty());
    }

    #[test]
    fn test_update_clears_description() {
        let state = model();
        let plan = WebhookEndpointModel {
            description: Attr::Null,
            ..state.clone()
        };
        let params = build_update_params(&state, &plan);
        assert_eq!(params.description.as_deref(), Some(""));
        assert_eq!(params.to_form().pairs().len(), 1);
    }

    #[test]
    fn test_update_metadata_symmetric_diff() {
        let state = WebhookEndpointModel {
            metadata: Attr::Value(BTreeMap::from([("meta1".to_string(), "value1".to_string())])),
            ..model()
        };
        let plan = WebhookEndpointModel {
            metadata: Attr::Value(BTreeMap::from([("meta2".to_string(), "value2".to_string())])),
            ..state.clone()
        };
        let form = build_update_params(&state, &plan).to_form();
        assert_eq!(form.get("metadata[meta1]"), Some(""));
        assert_eq!(form.get("metadata[meta2]"), Some("value2"));
    }

    #[test]
    fn test_update_disables_and_replaces_events() {
        let state = model();
        let plan = WebhookEndpointModel {
            disabled: Attr::Value(true),
            enabled_events: Attr::Value(vec!["invoice.paid".to_string(), "invoice.voided".to_string()]),
            ..state.clone()
        };
        let form = build_update_params(&state, &plan).to_form();
        assert_eq!(form.get("disabled"), Some("true"));
        assert_eq!(form.get("enabled_events[0]"), Some("invoice.paid"));
        assert_eq!(form.get("enabled_events[1]"), Some("invoice.voided"));
    }

    fn handler() -> WebhookEndpointResource<OfflineApi> {
        WebhookEndpointResource::new(Arc::new(OfflineApi))
    }

    #[test]
    fn test_plan_rejects_creating_disabled_endpoint() {
        let plan = WebhookEndpointModel {
            disabled: Attr::Value(true),
            url: Attr::Value("https://example.com".to_string()),
            ..Default::default()
        };
        let response = handler().modify_plan(ModifyPlanRequest {
            state: Attr::Null,
            plan: Attr::Value(plan.into_value()),
        });
        let diag = response.diagnostics.iter().next().unwrap();
        assert_eq!(diag.summary, "Client Error");
        assert_eq!(diag.detail, "Cannot create resource with attribute set to true");
        assert_eq!(diag.path, Some(AttributePath::root("disabled")));
    }

    #[test]
    fn test_plan_keeps_secret_and_flags_api_version() {
        let state = model();
        let plan = WebhookEndpointModel {
            id: Attr::Unknown,
            secret: Attr::Unknown,
            api_version: Attr::Value("2024-06-20".to_string()),
            ..state.clone()
        };
        let response = handler().modify_plan(ModifyPlanRequest {
            state: Attr::Value(state.into_value()),
            plan: Attr::Value(plan.into_value()),
        });
        assert!(!response.diagnostics.has_error());
        assert_eq!(response.requires_replace, vec![AttributePath::root("api_version")]);

        let mut diags = Diagnostics::new();
        let planned: Attr<WebhookEndpointModel> =
            Attr::from_dynamic(&response.plan, &AttributePath::empty(), &mut diags);
        let planned = planned.into_value().unwrap();
        assert_eq!(planned.secret, Attr::Value("whsec_abc".to_string()));
        assert_eq!(planned.id, Attr::Value("we_123".to_string()));
    }

    #[test]
    fn test_validate_rejects_plain_http_and_duplicate_events() {
        let config = WebhookEndpointModel {
            url: Attr::Value("http://example.com".to_string()),
            enabled_events: Attr::Value(vec!["a".to_string(), "a".to_string()]),
            ..Default::default()
        };
        let diags = handler().validate_config(ValidateConfigRequest {
            config: Attr::Value(config.into_value()),
        });
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().any(|d| d.detail.contains("must be a valid HTTPS URL")));
    }
}
