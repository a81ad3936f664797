//! The `stripe_coupon` resource.
//!
//! A coupon discounts either by percentage (`percent_off`) or by a fixed
//! amount per currency (`currency_options`). Exactly one currency option may
//! be marked `top_level`; it becomes the coupon's primary `amount_off` and
//! `currency`, and the remaining options are sent per currency.
//!
//! After creation Stripe only lets `name`, `metadata` and new currency
//! options change. Adding a currency is an in-place update; changing or
//! removing an existing one replaces the coupon.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use stripe_provider::api::FormParams;
//! use stripe_provider::resources::coupon::{build_create_params, CouponCurrencyOptionModel, CouponModel};
//! use stripe_provider::types::Attr;
//!
//! let plan = CouponModel {
//!     duration: Attr::Value("once".to_string()),
//!     currency_options: Attr::Value(BTreeMap::from([(
//!         "usd".to_string(),
//!         CouponCurrencyOptionModel {
//!             amount_off: Attr::Value(1000),
//!             top_level: Attr::Value(true),
//!         },
//!     )])),
//!     ..Default::default()
//! };
//!
//! let form = build_create_params(&plan).to_form();
//! assert_eq!(form.get("amount_off"), Some("1000"));
//! assert_eq!(form.get("currency"), Some("usd"));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{
    BillingApi, Coupon, CouponAppliesToParams, CouponCurrencyOptionParams, CouponParams,
    RemoteResource, StripeClient,
};
use crate::normalize::{
    float64_null_if_empty, int64_null_if_empty, list_null_if_empty, map_null_if_empty,
    string_null_if_empty,
};
use crate::resources::{
    changed_clearable, client_error, decode, metadata_changes, replace_if_changed,
    use_state_for_unknown, validators, CreateRequest, DeleteRequest, ImportRequest,
    ModifyPlanRequest, PlanResponse, ReadRequest, StateResponse, UpdateRequest,
    ValidateConfigRequest,
};
use crate::types::{read_object, Attr, AttrValue, AttributePath, Diagnostics, ObjectWriter, Value};

/// The orchestrator type name.
pub const TYPE_NAME: &str = "stripe_coupon";

/// Stripe omits `currency_options` unless asked for it.
const EXPAND: &str = "currency_options";

/// Attributes of a coupon.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CouponModel {
    pub id: Attr<String>,
    /// Product IDs the coupon is restricted to.
    pub applies_to: Attr<Vec<String>>,
    /// Amount off, keyed by lowercase currency code.
    pub currency_options: Attr<BTreeMap<String, CouponCurrencyOptionModel>>,
    pub duration: Attr<String>,
    pub duration_in_months: Attr<i64>,
    pub max_redemptions: Attr<i64>,
    pub metadata: Attr<BTreeMap<String, String>>,
    pub name: Attr<String>,
    pub percent_off: Attr<f64>,
    pub redeem_by: Attr<i64>,
}

/// Amount off in one currency.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CouponCurrencyOptionModel {
    pub amount_off: Attr<i64>,
    /// Marks the coupon's primary currency.
    pub top_level: Attr<bool>,
}

impl AttrValue for CouponCurrencyOptionModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            amount_off: r.attr("amount_off"),
            top_level: r.attr("top_level"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("amount_off", self.amount_off)
            .attr("top_level", self.top_level)
            .finish()
    }
}

impl AttrValue for CouponModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            id: r.attr("id"),
            applies_to: r.attr("applies_to"),
            currency_options: r.attr("currency_options"),
            duration: r.attr("duration"),
            duration_in_months: r.attr("duration_in_months"),
            max_redemptions: r.attr("max_redemptions"),
            metadata: r.attr("metadata"),
            name: r.attr("name"),
            percent_off: r.attr("percent_off"),
            redeem_by: r.attr("redeem_by"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("id", self.id)
            .attr("applies_to", self.applies_to)
            .attr("currency_options", self.currency_options)
            .attr("duration", self.duration)
            .attr("duration_in_months", self.duration_in_months)
            .attr("max_redemptions", self.max_redemptions)
            .attr("metadata", self.metadata)
            .attr("name", self.name)
            .attr("percent_off", self.percent_off)
            .attr("redeem_by", self.redeem_by)
            .finish()
    }
}

/// Copies a coupon into the model. `id` is left alone.
pub fn populate_model(model: &mut CouponModel, coupon: &Coupon) {
    let products = coupon
        .applies_to
        .as_ref()
        .map(|applies_to| applies_to.products.clone())
        .unwrap_or_default();
    model.applies_to = list_null_if_empty(Attr::Value(products));

    let options = coupon
        .currency_options
        .iter()
        .map(|(currency, option)| {
            let option = CouponCurrencyOptionModel {
                amount_off: int64_null_if_empty(option.amount_off),
                top_level: Attr::Value(*currency == coupon.currency),
            };
            (currency.clone(), option)
        })
        .collect();
    model.currency_options = map_null_if_empty(Attr::Value(options));

    model.duration = string_null_if_empty(&coupon.duration);
    model.duration_in_months = int64_null_if_empty(coupon.duration_in_months);
    model.max_redemptions = int64_null_if_empty(coupon.max_redemptions);
    model.metadata = map_null_if_empty(Attr::Value(coupon.metadata.clone()));
    model.name = string_null_if_empty(&coupon.name);
    model.percent_off = float64_null_if_empty(coupon.percent_off);
    model.redeem_by = int64_null_if_empty(coupon.redeem_by);
}

/// Builds create params from a plan.
///
/// The `top_level` currency option is sent as the coupon's `amount_off` and
/// `currency`; every other option goes into `currency_options`.
#[must_use]
pub fn build_create_params(plan: &CouponModel) -> CouponParams {
    let mut params = CouponParams {
        id: plan.id.to_option(),
        applies_to: plan
            .applies_to
            .to_option()
            .map(|products| CouponAppliesToParams { products }),
        duration: plan.duration.to_option(),
        duration_in_months: plan.duration_in_months.to_option(),
        max_redemptions: plan.max_redemptions.to_option(),
        metadata: plan.metadata.to_option().unwrap_or_default(),
        name: plan.name.to_option(),
        percent_off: plan.percent_off.to_option(),
        redeem_by: plan.redeem_by.to_option(),
        ..Default::default()
    };

    if let Some(options) = plan.currency_options.value() {
        let mut per_currency = BTreeMap::new();
        for (currency, option) in options {
            if option.top_level == Attr::Value(true) {
                params.amount_off = option.amount_off.to_option();
                params.currency = Some(currency.clone());
            } else {
                per_currency.insert(
                    currency.clone(),
                    CouponCurrencyOptionParams {
                        amount_off: option.amount_off.to_option(),
                    },
                );
            }
        }
        params.currency_options = Some(per_currency);
    }

    params
}

/// Returns the currency options present in the plan but not in state.
fn added_currency_options(
    state: &Attr<BTreeMap<String, CouponCurrencyOptionModel>>,
    plan: &Attr<BTreeMap<String, CouponCurrencyOptionModel>>,
) -> Option<BTreeMap<String, CouponCurrencyOptionParams>> {
    if plan == state {
        return None;
    }
    let planned = plan.value()?;
    let existing = state.value();
    let added: BTreeMap<_, _> = planned
        .iter()
        .filter(|(currency, _)| existing.map_or(true, |e| !e.contains_key(*currency)))
        .map(|(currency, option)| {
            let params = CouponCurrencyOptionParams {
                amount_off: option.amount_off.to_option(),
            };
            (currency.clone(), params)
        })
        .collect();
    (!added.is_empty()).then_some(added)
}

/// Builds the change-set between state and plan.
///
/// Removed currency options are never sent: removal replaces the coupon.
#[must_use]
pub fn build_update_params(state: &CouponModel, plan: &CouponModel) -> CouponParams {
    CouponParams {
        currency_options: added_currency_options(&state.currency_options, &plan.currency_options),
        metadata: metadata_changes(&state.metadata, &plan.metadata),
        name: changed_clearable(&state.name, &plan.name),
        ..Default::default()
    }
}

/// Returns `true` when a currency option change cannot be applied in place.
fn currency_options_require_replace(
    state: &Attr<BTreeMap<String, CouponCurrencyOptionModel>>,
    plan: &Attr<BTreeMap<String, CouponCurrencyOptionModel>>,
) -> bool {
    if plan == state {
        return false;
    }
    let Some(existing) = state.value() else {
        return false;
    };
    match plan {
        Attr::Unknown => true,
        Attr::Null => !existing.is_empty(),
        Attr::Value(planned) => existing.iter().any(|(currency, old)| {
            planned.get(currency).map_or(true, |new| {
                new.amount_off != old.amount_off || new.top_level != old.top_level
            })
        }),
    }
}

fn expanded_params() -> CouponParams {
    let mut params = CouponParams::default();
    params.add_expand(EXPAND);
    params
}

/// Handler for `stripe_coupon`.
#[derive(Debug)]
pub struct CouponResource<C = StripeClient> {
    client: Arc<C>,
}

impl<C: BillingApi> CouponResource<C> {
    /// Creates a handler that calls Stripe through `client`.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Creates a coupon.
    pub async fn create(&self, req: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut plan) = decode::<CouponModel>(&req.plan, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let mut params = build_create_params(&plan);
        params.add_expand(EXPAND);
        let coupon = match self.client.create::<Coupon>(&params).await {
            Ok(coupon) => coupon,
            Err(err) => {
                client_error(&mut diags, "create", Coupon::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        plan.id = Attr::Value(coupon.id.clone());
        populate_model(&mut plan, &coupon);

        tracing::trace!(resource = TYPE_NAME, id = %coupon.id, "created a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Refreshes a coupon.
    pub async fn read(&self, req: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut state) = decode::<CouponModel>(&req.state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let id = state.id.to_option().unwrap_or_default();
        match self.client.get::<Coupon>(&id, &expanded_params()).await {
            Ok(coupon) => populate_model(&mut state, &coupon),
            Err(err) => {
                client_error(&mut diags, "read", Coupon::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "read a resource");
        StateResponse::from_model(state, diags)
    }

    /// Sends the changed fields of a coupon.
    pub async fn update(&self, req: UpdateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let state = decode::<CouponModel>(&req.state, &mut diags);
        let plan = decode::<CouponModel>(&req.plan, &mut diags);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return StateResponse::failed(diags);
        };

        let mut params = build_update_params(&state, &plan);
        params.add_expand(EXPAND);
        let id = plan.id.to_option().unwrap_or_default();
        match self.client.update::<Coupon>(&id, &params).await {
            Ok(coupon) => populate_model(&mut plan, &coupon),
            Err(err) => {
                client_error(&mut diags, "update", Coupon::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "updated a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Deletes a coupon.
    pub async fn delete(&self, req: DeleteRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(state) = decode::<CouponModel>(&req.state, &mut diags) else {
            return diags;
        };

        let id = state.id.to_option().unwrap_or_default();
        if let Err(err) = self.client.delete::<Coupon>(&id).await {
            client_error(&mut diags, "delete", Coupon::NAME, &err);
            return diags;
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "deleted a resource");
        diags
    }

    /// Adopts an existing coupon.
    pub async fn import(&self, req: ImportRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let coupon = match self.client.get::<Coupon>(&req.id, &expanded_params()).await {
            Ok(coupon) => coupon,
            Err(err) => {
                client_error(&mut diags, "import", Coupon::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        let mut state = CouponModel {
            id: Attr::Value(req.id.clone()),
            ..Default::default()
        };
        populate_model(&mut state, &coupon);

        tracing::trace!(resource = TYPE_NAME, id = %req.id, "imported a resource");
        StateResponse::from_model(state, diags)
    }

    /// Flags changes Stripe cannot apply to an existing coupon.
    #[must_use]
    pub fn modify_plan(&self, req: ModifyPlanRequest) -> PlanResponse {
        let mut response = PlanResponse {
            plan: req.plan.clone(),
            ..Default::default()
        };
        if req.plan.is_null() || req.state.is_null() {
            return response;
        }
        let state = decode::<CouponModel>(&req.state, &mut response.diagnostics);
        let plan = decode::<CouponModel>(&req.plan, &mut response.diagnostics);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return response;
        };

        use_state_for_unknown(&state.id, &mut plan.id);
        let replace = &mut response.requires_replace;
        replace_if_changed(replace, "id", &state.id, &plan.id);
        replace_if_changed(replace, "applies_to", &state.applies_to, &plan.applies_to);
        if currency_options_require_replace(&state.currency_options, &plan.currency_options) {
            replace.push(AttributePath::root("currency_options"));
        }
        replace_if_changed(replace, "percent_off", &state.percent_off, &plan.percent_off);

        response.plan = Attr::Value(plan.into_value());
        response
    }

    /// Checks value ranges, allowed durations and attribute combinations.
    #[must_use]
    pub fn validate_config(&self, req: ValidateConfigRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(config) = decode::<CouponModel>(&req.config, &mut diags) else {
            return diags;
        };

        validators::list(&mut diags, &AttributePath::root("applies_to"), &config.applies_to, None);

        if let Some(options) = config.currency_options.value() {
            let path = AttributePath::root("currency_options");
            for (currency, option) in options {
                let amount_off = path.key(currency.as_str()).attribute("amount_off");
                validators::at_least(&mut diags, amount_off, &option.amount_off, 1);
            }
        }

        validators::one_of(
            &mut diags,
            AttributePath::root("duration"),
            &config.duration,
            &["forever", "once", "repeating"],
        );
        let duration_in_months = AttributePath::root("duration_in_months");
        validators::at_least(&mut diags, duration_in_months.clone(), &config.duration_in_months, 1);
        validators::also_requires(
            &mut diags,
            duration_in_months,
            !config.duration_in_months.is_null(),
            "duration",
            !config.duration.is_null(),
        );
        validators::at_least(
            &mut diags,
            AttributePath::root("max_redemptions"),
            &config.max_redemptions,
            1,
        );
        validators::metadata(&mut diags, &config.metadata);

        let percent_off = AttributePath::root("percent_off");
        validators::between(&mut diags, percent_off.clone(), &config.percent_off, 1.0, 100.0);
        validators::conflicts_with(
            &mut diags,
            percent_off,
            !config.percent_off.is_null(),
            "currency_options",
            !config.currency_options.is_null(),
        );
        diags
    }
}
