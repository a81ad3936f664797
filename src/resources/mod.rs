//! Resource handlers for the four Stripe resource types.
//!
//! Each handler maps one orchestrator resource type onto the Stripe API:
//!
//! | Type name | Handler | Stripe object |
//! |-----------|---------|---------------|
//! | `stripe_coupon` | [`CouponResource`] | [`Coupon`](crate::api::Coupon) |
//! | `stripe_price` | [`PriceResource`] | [`Price`](crate::api::Price) |
//! | `stripe_product` | [`ProductResource`] | [`Product`](crate::api::Product) |
//! | `stripe_webhook_endpoint` | [`WebhookEndpointResource`] | [`WebhookEndpoint`](crate::api::WebhookEndpoint) |
//!
//! Every handler follows the same shape. A lifecycle call decodes the
//! request's dynamic attributes into a typed model, builds params, makes a
//! single API call, and populates the result back into the model. Problems
//! never escape as `Err`: they are collected in the response's
//! [`Diagnostics`], and a response with an error carries no state.
//!
//! [`ResourceHandler`] dispatches a request to the right handler by type
//! name.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stripe_provider::resources::{ReadRequest, ResourceHandler};
//!
//! let handler = ResourceHandler::new("stripe_coupon", Arc::new(client)).unwrap();
//! let response = handler.read(ReadRequest { state }).await;
//! if response.diagnostics.has_error() {
//!     // report and stop
//! }
//! ```

pub mod coupon;
pub mod price;
pub mod product;
mod validators;
pub mod webhook_endpoint;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use coupon::CouponResource;
pub use price::PriceResource;
pub use product::ProductResource;
pub use webhook_endpoint::WebhookEndpointResource;

use crate::api::{ApiError, BillingApi, StripeClient};
use crate::normalize::empty_string_if_null;
use crate::types::{Attr, AttrValue, AttributePath, Diagnostics, DynamicValue};

/// Request to create a resource from a plan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateRequest {
    /// The planned attributes.
    pub plan: DynamicValue,
}

/// Request to refresh a resource from the remote API.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadRequest {
    /// The prior state.
    pub state: DynamicValue,
}

/// Request to apply a plan to an existing resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateRequest {
    /// The prior state.
    pub state: DynamicValue,
    /// The planned attributes.
    pub plan: DynamicValue,
}

/// Request to delete a resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteRequest {
    /// The prior state.
    pub state: DynamicValue,
}

/// Request to adopt an existing remote object by ID.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportRequest {
    /// The remote object's ID.
    pub id: String,
}

/// Request to adjust a proposed plan before it is shown to the practitioner.
///
/// `state` is `Null` when the resource is being created and `plan` is `Null`
/// when it is being destroyed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifyPlanRequest {
    /// The prior state.
    pub state: DynamicValue,
    /// The proposed plan.
    pub plan: DynamicValue,
}

/// Request to validate practitioner configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidateConfigRequest {
    /// The configuration, which may contain unknown values.
    pub config: DynamicValue,
}

/// Response carrying new state.
///
/// `state` is `Null` whenever `diagnostics` contains an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateResponse {
    /// The new state.
    pub state: DynamicValue,
    /// Problems encountered.
    pub diagnostics: Diagnostics,
}

impl StateResponse {
    /// Builds a response from a model, dropping the state if `diagnostics`
    /// contains an error.
    fn from_model<M: AttrValue>(model: M, diagnostics: Diagnostics) -> Self {
        if diagnostics.has_error() {
            return Self::failed(diagnostics);
        }
        Self {
            state: Attr::Value(model.into_value()),
            diagnostics,
        }
    }

    const fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: Attr::Null,
            diagnostics,
        }
    }
}

/// Response to a [`ModifyPlanRequest`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanResponse {
    /// The adjusted plan.
    pub plan: DynamicValue,
    /// Attributes whose change forces the resource to be replaced.
    pub requires_replace: Vec<AttributePath>,
    /// Problems encountered.
    pub diagnostics: Diagnostics,
}

/// A handler for one resource type, selected by type name.
#[derive(Debug)]
pub enum ResourceHandler<C = StripeClient> {
    /// `stripe_coupon`
    Coupon(CouponResource<C>),
    /// `stripe_price`
    Price(PriceResource<C>),
    /// `stripe_product`
    Product(ProductResource<C>),
    /// `stripe_webhook_endpoint`
    WebhookEndpoint(WebhookEndpointResource<C>),
}

impl<C: BillingApi> ResourceHandler<C> {
    /// All supported type names, in registration order.
    pub const TYPE_NAMES: [&'static str; 4] = [
        coupon::TYPE_NAME,
        price::TYPE_NAME,
        product::TYPE_NAME,
        webhook_endpoint::TYPE_NAME,
    ];

    /// Creates the handler for `type_name`, or `None` if the type is not
    /// supported.
    #[must_use]
    pub fn new(type_name: &str, client: Arc<C>) -> Option<Self> {
        match type_name {
            coupon::TYPE_NAME => Some(Self::Coupon(CouponResource::new(client))),
            price::TYPE_NAME => Some(Self::Price(PriceResource::new(client))),
            product::TYPE_NAME => Some(Self::Product(ProductResource::new(client))),
            webhook_endpoint::TYPE_NAME => {
                Some(Self::WebhookEndpoint(WebhookEndpointResource::new(client)))
            }
            _ => None,
        }
    }

    /// Returns the type name this handler serves.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Coupon(_) => coupon::TYPE_NAME,
            Self::Price(_) => price::TYPE_NAME,
            Self::Product(_) => product::TYPE_NAME,
            Self::WebhookEndpoint(_) => webhook_endpoint::TYPE_NAME,
        }
    }

    /// Creates the remote object described by the plan.
    pub async fn create(&self, req: CreateRequest) -> StateResponse {
        match self {
            Self::Coupon(r) => r.create(req).await,
            Self::Price(r) => r.create(req).await,
            Self::Product(r) => r.create(req).await,
            Self::WebhookEndpoint(r) => r.create(req).await,
        }
    }

    /// Refreshes state from the remote object.
    pub async fn read(&self, req: ReadRequest) -> StateResponse {
        match self {
            Self::Coupon(r) => r.read(req).await,
            Self::Price(r) => r.read(req).await,
            Self::Product(r) => r.read(req).await,
            Self::WebhookEndpoint(r) => r.read(req).await,
        }
    }

    /// Sends the difference between state and plan.
    pub async fn update(&self, req: UpdateRequest) -> StateResponse {
        match self {
            Self::Coupon(r) => r.update(req).await,
            Self::Price(r) => r.update(req).await,
            Self::Product(r) => r.update(req).await,
            Self::WebhookEndpoint(r) => r.update(req).await,
        }
    }

    /// Deletes the remote object.
    pub async fn delete(&self, req: DeleteRequest) -> Diagnostics {
        match self {
            Self::Coupon(r) => r.delete(req).await,
            Self::Price(r) => r.delete(req).await,
            Self::Product(r) => r.delete(req).await,
            Self::WebhookEndpoint(r) => r.delete(req).await,
        }
    }

    /// Adopts an existing remote object.
    pub async fn import(&self, req: ImportRequest) -> StateResponse {
        match self {
            Self::Coupon(r) => r.import(req).await,
            Self::Price(r) => r.import(req).await,
            Self::Product(r) => r.import(req).await,
            Self::WebhookEndpoint(r) => r.import(req).await,
        }
    }

    /// Adjusts a proposed plan.
    #[must_use]
    pub fn modify_plan(&self, req: ModifyPlanRequest) -> PlanResponse {
        match self {
            Self::Coupon(r) => r.modify_plan(req),
            Self::Price(r) => r.modify_plan(req),
            Self::Product(r) => r.modify_plan(req),
            Self::WebhookEndpoint(r) => r.modify_plan(req),
        }
    }

    /// Validates practitioner configuration.
    #[must_use]
    pub fn validate_config(&self, req: ValidateConfigRequest) -> Diagnostics {
        match self {
            Self::Coupon(r) => r.validate_config(req),
            Self::Price(r) => r.validate_config(req),
            Self::Product(r) => r.validate_config(req),
            Self::WebhookEndpoint(r) => r.validate_config(req),
        }
    }
}

/// Decodes a dynamic resource object into its model.
///
/// Returns `None` after recording diagnostics when the value does not
/// convert, or is not a concrete object.
fn decode<M: AttrValue>(value: &DynamicValue, diags: &mut Diagnostics) -> Option<M> {
    let mut local = Diagnostics::new();
    let model = Attr::<M>::from_dynamic(value, &AttributePath::empty(), &mut local);
    let failed = local.has_error();
    diags.append(local);
    if failed {
        return None;
    }
    match model {
        Attr::Value(model) => Some(model),
        Attr::Null | Attr::Unknown => {
            diags.add_error(
                "Value Conversion Error",
                "Expected a resource object, got a null or unknown value.",
            );
            None
        }
    }
}

/// Records a failed API call.
fn client_error(diags: &mut Diagnostics, operation: &str, resource: &str, err: &ApiError) {
    diags.add_error(
        "Client Error",
        format!("Unable to {operation} {resource}, got error: {err}"),
    );
}

/// Returns the plan value of a field that changed, or `None` if it did not.
///
/// A `Null` plan value also yields `None`: the field is left untouched.
fn changed_value<T: Clone + PartialEq>(state: &Attr<T>, plan: &Attr<T>) -> Option<T> {
    if plan == state {
        return None;
    }
    plan.to_option()
}

/// Returns the wire value of a clearable string field that changed.
///
/// A `Null` plan value becomes `""`, which Stripe treats as "clear".
fn changed_clearable(state: &Attr<String>, plan: &Attr<String>) -> Option<String> {
    if plan == state || plan.is_unknown() {
        return None;
    }
    Some(empty_string_if_null(plan))
}

/// Returns the replacement for a list field that changed.
///
/// Lists are replaced wholesale. A `Null` plan value becomes the empty list,
/// which clears the field.
fn changed_list<T: Clone + PartialEq>(state: &Attr<Vec<T>>, plan: &Attr<Vec<T>>) -> Option<Vec<T>> {
    if plan == state || plan.is_unknown() {
        return None;
    }
    Some(plan.to_option().unwrap_or_default())
}

/// Computes the metadata entries to send for a metadata change.
///
/// Every plan entry is sent with its value and every entry only present in
/// state is sent as `""`, which deletes it.
fn metadata_changes(
    state: &Attr<BTreeMap<String, String>>,
    plan: &Attr<BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    if plan == state || plan.is_unknown() {
        return BTreeMap::new();
    }
    let mut changes = plan.to_option().unwrap_or_default();
    if let Some(state) = state.value() {
        for key in state.keys() {
            changes.entry(key.clone()).or_default();
        }
    }
    changes
}

/// Copies a computed attribute from state when the plan does not know it.
fn use_state_for_unknown<T: Clone>(state: &Attr<T>, plan: &mut Attr<T>) {
    if plan.is_unknown() && !state.is_null() {
        *plan = state.clone();
    }
}

/// Records `name` as requiring replacement if its planned value differs.
fn replace_if_changed<T: PartialEq>(
    paths: &mut Vec<AttributePath>,
    name: &str,
    state: &Attr<T>,
    plan: &Attr<T>,
) {
    if plan != state {
        paths.push(AttributePath::root(name));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(entries: &[(&str, &str)]) -> Attr<BTreeMap<String, String>> {
        Attr::Value(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_metadata_symmetric_diff() {
        let changes = metadata_changes(
            &metadata(&[("meta1", "value1")]),
            &metadata(&[("meta2", "value2")]),
        );
        assert_eq!(changes.get("meta1").map(String::as_str), Some(""));
        assert_eq!(changes.get("meta2").map(String::as_str), Some("value2"));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_metadata_removed_entirely_clears_every_key() {
        let changes = metadata_changes(&metadata(&[("a", "1"), ("b", "2")]), &Attr::Null);
        assert_eq!(changes.get("a").map(String::as_str), Some(""));
        assert_eq!(changes.get("b").map(String::as_str), Some(""));
    }

    #[test]
    fn test_unchanged_metadata_sends_nothing() {
        let m = metadata(&[("a", "1")]);
        assert!(metadata_changes(&m, &m).is_empty());
    }

    #[test]
    fn test_changed_clearable_sends_empty_string_for_null() {
        assert_eq!(
            changed_clearable(&Attr::Value("x".to_string()), &Attr::Null),
            Some(String::new())
        );
        assert_eq!(changed_clearable(&Attr::Null, &Attr::Null), None);
        assert_eq!(changed_clearable(&Attr::Null, &Attr::Unknown), None);
    }

    #[test]
    fn test_changed_list_clears_with_empty_list() {
        let state = Attr::Value(vec!["a".to_string()]);
        assert_eq!(changed_list(&state, &Attr::Null), Some(vec![]));
        assert_eq!(changed_list(&state, &state.clone()), None);
    }

    #[test]
    fn test_changed_value_ignores_null_plan() {
        assert_eq!(changed_value(&Attr::Value(true), &Attr::Value(false)), Some(false));
        assert_eq!(changed_value(&Attr::Value(true), &Attr::<bool>::Null), None);
    }

    #[test]
    fn test_use_state_for_unknown() {
        let state = Attr::Value("we_1".to_string());
        let mut plan = Attr::Unknown;
        use_state_for_unknown(&state, &mut plan);
        assert_eq!(plan, state);

        let mut plan = Attr::Unknown;
        use_state_for_unknown(&Attr::<String>::Null, &mut plan);
        assert!(plan.is_unknown());
    }

    #[test]
    fn test_client_error_message() {
        let mut diags = Diagnostics::new();
        let err = ApiError::NotFound {
            resource: "coupon",
            id: "gold".to_string(),
        };
        client_error(&mut diags, "read", "coupon", &err);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Client Error");
        assert_eq!(
            diag.detail,
            "Unable to read coupon, got error: coupon with id gold not found"
        );
    }

    #[test]
    fn test_handler_dispatch_by_type_name() {
        let client = Arc::new(
            StripeClient::new(
                &crate::ProviderConfig::builder()
                    .api_key(crate::ApiKey::new("sk_test_1").unwrap())
                    .build()
                    .unwrap(),
            )
            .unwrap(),
        );
        for name in ResourceHandler::<StripeClient>::TYPE_NAMES {
            let handler = ResourceHandler::new(name, Arc::clone(&client)).unwrap();
            assert_eq!(handler.type_name(), name);
        }
        assert!(ResourceHandler::new("stripe_customer", client).is_none());
    }
}
