//! The `stripe_price` resource.
//!
//! A price sets how much and how often a product is charged. Almost every
//! pricing field is immutable once the price exists, so changing one of them
//! replaces the price. Only `active`, `lookup_key`, `metadata`, `nickname`,
//! `tax_behavior` and new currency options are updated in place.
//!
//! Stripe cannot delete prices. Deleting a `stripe_price` fails with an error
//! that asks for the price to be archived (`active = false`) instead.
//!
//! Decimal amounts travel as strings. `unit_amount_decimal` is a number in
//! the model and is parsed on read; the per-tier decimal amounts stay
//! strings.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{
    BillingApi, Expandable, Price, PriceCurrencyOption, PriceCurrencyOptionParams,
    PriceCustomUnitAmount, PriceCustomUnitAmountParams, PriceParams, PriceRecurringParams,
    PriceTier, PriceTierParams, PriceTransformQuantityParams, RemoteResource, StripeClient, UpTo,
};
use crate::normalize::{
    float64_null_if_empty, int64_null_if_empty, list_null_if_empty, map_null_if_empty,
    string_null_if_empty,
};
use crate::resources::{
    changed_clearable, changed_value, client_error, decode, metadata_changes, replace_if_changed,
    use_state_for_unknown, validators, CreateRequest, DeleteRequest, ImportRequest,
    ModifyPlanRequest, PlanResponse, ReadRequest, StateResponse, UpdateRequest,
    ValidateConfigRequest,
};
use crate::types::{read_object, Attr, AttrValue, AttributePath, Diagnostics, ObjectWriter, Value};

/// The orchestrator type name.
pub const TYPE_NAME: &str = "stripe_price";

/// Response fields Stripe omits unless asked for them.
const EXPAND: [&str; 2] = ["currency_options", "tiers"];

/// Attributes of a price.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceModel {
    pub id: Attr<String>,
    pub active: Attr<bool>,
    pub billing_scheme: Attr<String>,
    pub currency: Attr<String>,
    /// Pricing keyed by lowercase currency code.
    pub currency_options: Attr<BTreeMap<String, PriceCurrencyOptionModel>>,
    pub custom_unit_amount: Attr<CustomUnitAmountModel>,
    pub lookup_key: Attr<String>,
    pub metadata: Attr<BTreeMap<String, String>>,
    pub nickname: Attr<String>,
    /// ID of the product the price belongs to.
    pub product: Attr<String>,
    pub recurring: Attr<RecurringModel>,
    pub tax_behavior: Attr<String>,
    pub tiers: Attr<Vec<TierModel>>,
    pub tiers_mode: Attr<String>,
    pub transform_quantity: Attr<TransformQuantityModel>,
    pub unit_amount: Attr<i64>,
    pub unit_amount_decimal: Attr<f64>,
}

/// Pricing in one currency.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceCurrencyOptionModel {
    pub custom_unit_amount: Attr<CustomUnitAmountModel>,
    pub tax_behavior: Attr<String>,
    pub tiers: Attr<Vec<TierModel>>,
    pub unit_amount: Attr<i64>,
    pub unit_amount_decimal: Attr<f64>,
    /// Marks the price's primary currency.
    pub top_level: Attr<bool>,
}

/// Bounds for a customer-chosen amount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomUnitAmountModel {
    pub maximum: Attr<i64>,
    pub minimum: Attr<i64>,
    pub preset: Attr<i64>,
}

/// Billing recurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecurringModel {
    pub interval: Attr<String>,
    pub aggregate_usage: Attr<String>,
    pub interval_count: Attr<i64>,
    pub meter: Attr<String>,
    pub usage_type: Attr<String>,
}

/// One pricing tier. A `Null` `up_to` is the unbounded last tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierModel {
    pub flat_amount: Attr<i64>,
    pub flat_amount_decimal: Attr<String>,
    pub unit_amount: Attr<i64>,
    pub unit_amount_decimal: Attr<String>,
    pub up_to: Attr<i64>,
}

/// Quantity transformation before billing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformQuantityModel {
    pub divide_by: Attr<i64>,
    pub round: Attr<String>,
}

impl AttrValue for CustomUnitAmountModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            maximum: r.attr("maximum"),
            minimum: r.attr("minimum"),
            preset: r.attr("preset"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("maximum", self.maximum)
            .attr("minimum", self.minimum)
            .attr("preset", self.preset)
            .finish()
    }
}

impl AttrValue for RecurringModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            interval: r.attr("interval"),
            aggregate_usage: r.attr("aggregate_usage"),
            interval_count: r.attr("interval_count"),
            meter: r.attr("meter"),
            usage_type: r.attr("usage_type"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("interval", self.interval)
            .attr("aggregate_usage", self.aggregate_usage)
            .attr("interval_count", self.interval_count)
            .attr("meter", self.meter)
            .attr("usage_type", self.usage_type)
            .finish()
    }
}

impl AttrValue for TierModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            flat_amount: r.attr("flat_amount"),
            flat_amount_decimal: r.attr("flat_amount_decimal"),
            unit_amount: r.attr("unit_amount"),
            unit_amount_decimal: r.attr("unit_amount_decimal"),
            up_to: r.attr("up_to"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("flat_amount", self.flat_amount)
            .attr("flat_amount_decimal", self.flat_amount_decimal)
            .attr("unit_amount", self.unit_amount)
            .attr("unit_amount_decimal", self.unit_amount_decimal)
            .attr("up_to", self.up_to)
            .finish()
    }
}

impl AttrValue for TransformQuantityModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            divide_by: r.attr("divide_by"),
            round: r.attr("round"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("divide_by", self.divide_by)
            .attr("round", self.round)
            .finish()
    }
}

impl AttrValue for PriceCurrencyOptionModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            custom_unit_amount: r.attr("custom_unit_amount"),
            tax_behavior: r.attr("tax_behavior"),
            tiers: r.attr("tiers"),
            unit_amount: r.attr("unit_amount"),
            unit_amount_decimal: r.attr("unit_amount_decimal"),
            top_level: r.attr("top_level"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("custom_unit_amount", self.custom_unit_amount)
            .attr("tax_behavior", self.tax_behavior)
            .attr("tiers", self.tiers)
            .attr("unit_amount", self.unit_amount)
            .attr("unit_amount_decimal", self.unit_amount_decimal)
            .attr("top_level", self.top_level)
            .finish()
    }
}

impl AttrValue for PriceModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            id: r.attr("id"),
            active: r.attr("active"),
            billing_scheme: r.attr("billing_scheme"),
            currency: r.attr("currency"),
            currency_options: r.attr("currency_options"),
            custom_unit_amount: r.attr("custom_unit_amount"),
            lookup_key: r.attr("lookup_key"),
            metadata: r.attr("metadata"),
            nickname: r.attr("nickname"),
            product: r.attr("product"),
            recurring: r.attr("recurring"),
            tax_behavior: r.attr("tax_behavior"),
            tiers: r.attr("tiers"),
            tiers_mode: r.attr("tiers_mode"),
            transform_quantity: r.attr("transform_quantity"),
            unit_amount: r.attr("unit_amount"),
            unit_amount_decimal: r.attr("unit_amount_decimal"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("id", self.id)
            .attr("active", self.active)
            .attr("billing_scheme", self.billing_scheme)
            .attr("currency", self.currency)
            .attr("currency_options", self.currency_options)
            .attr("custom_unit_amount", self.custom_unit_amount)
            .attr("lookup_key", self.lookup_key)
            .attr("metadata", self.metadata)
            .attr("nickname", self.nickname)
            .attr("product", self.product)
            .attr("recurring", self.recurring)
            .attr("tax_behavior", self.tax_behavior)
            .attr("tiers", self.tiers)
            .attr("tiers_mode", self.tiers_mode)
            .attr("transform_quantity", self.transform_quantity)
            .attr("unit_amount", self.unit_amount)
            .attr("unit_amount_decimal", self.unit_amount_decimal)
            .finish()
    }
}

// Remote -> model

/// Parses a decimal amount string. `""` reads as `Null`.
fn parse_decimal(raw: &str, path: AttributePath, diags: &mut Diagnostics) -> Attr<f64> {
    if raw.is_empty() {
        return Attr::Null;
    }
    match raw.parse::<f64>() {
        Ok(amount) => float64_null_if_empty(amount),
        Err(err) => {
            diags.add_attribute_error(
                path,
                "Value Conversion Error",
                format!("Could not parse {raw:?} as a decimal amount: {err}"),
            );
            Attr::Null
        }
    }
}

fn custom_unit_amount_model(custom: Option<&PriceCustomUnitAmount>) -> Attr<CustomUnitAmountModel> {
    Attr::from_option(custom.map(|c| CustomUnitAmountModel {
        maximum: int64_null_if_empty(c.maximum),
        minimum: int64_null_if_empty(c.minimum),
        preset: int64_null_if_empty(c.preset),
    }))
}

fn tiers_model(tiers: &[PriceTier]) -> Attr<Vec<TierModel>> {
    let tiers = tiers
        .iter()
        .map(|tier| TierModel {
            flat_amount: int64_null_if_empty(tier.flat_amount),
            flat_amount_decimal: string_null_if_empty(&tier.flat_amount_decimal),
            unit_amount: int64_null_if_empty(tier.unit_amount),
            unit_amount_decimal: string_null_if_empty(&tier.unit_amount_decimal),
            up_to: Attr::from_option(tier.up_to),
        })
        .collect();
    list_null_if_empty(Attr::Value(tiers))
}

fn currency_option_model(
    currency: &str,
    option: &PriceCurrencyOption,
    price: &Price,
    diags: &mut Diagnostics,
) -> PriceCurrencyOptionModel {
    let path = AttributePath::root("currency_options")
        .key(currency)
        .attribute("unit_amount_decimal");
    PriceCurrencyOptionModel {
        custom_unit_amount: custom_unit_amount_model(option.custom_unit_amount.as_ref()),
        tax_behavior: string_null_if_empty(&option.tax_behavior),
        tiers: tiers_model(&option.tiers),
        unit_amount: int64_null_if_empty(option.unit_amount),
        unit_amount_decimal: parse_decimal(&option.unit_amount_decimal, path, diags),
        top_level: Attr::Value(currency == price.currency),
    }
}

/// Copies a price into the model. `id` is left alone.
///
/// A decimal amount that does not parse is recorded in `diags` and read as
/// `Null`.
pub fn populate_model(model: &mut PriceModel, price: &Price, diags: &mut Diagnostics) {
    model.active = Attr::Value(price.active);
    model.billing_scheme = string_null_if_empty(&price.billing_scheme);
    model.currency = string_null_if_empty(&price.currency);

    let options = price
        .currency_options
        .iter()
        .map(|(currency, option)| {
            (
                currency.clone(),
                currency_option_model(currency, option, price, diags),
            )
        })
        .collect();
    model.currency_options = map_null_if_empty(Attr::Value(options));

    model.custom_unit_amount = custom_unit_amount_model(price.custom_unit_amount.as_ref());
    model.lookup_key = string_null_if_empty(&price.lookup_key);
    model.metadata = map_null_if_empty(Attr::Value(price.metadata.clone()));
    model.nickname = string_null_if_empty(&price.nickname);
    model.product = Attr::from_option(price.product.as_ref().map(|p| Expandable::id(p).to_string()));
    model.recurring = Attr::from_option(price.recurring.as_ref().map(|r| {
        RecurringModel {
            interval: string_null_if_empty(&r.interval),
            aggregate_usage: string_null_if_empty(&r.aggregate_usage),
            interval_count: int64_null_if_empty(r.interval_count),
            meter: string_null_if_empty(&r.meter),
            usage_type: string_null_if_empty(&r.usage_type),
        }
    }));
    model.tax_behavior = string_null_if_empty(&price.tax_behavior);
    model.tiers = tiers_model(&price.tiers);
    model.tiers_mode = string_null_if_empty(&price.tiers_mode);
    model.transform_quantity = Attr::from_option(price.transform_quantity.as_ref().map(|t| {
        TransformQuantityModel {
            divide_by: int64_null_if_empty(t.divide_by),
            round: string_null_if_empty(&t.round),
        }
    }));
    model.unit_amount = int64_null_if_empty(price.unit_amount);
    model.unit_amount_decimal = parse_decimal(
        &price.unit_amount_decimal,
        AttributePath::root("unit_amount_decimal"),
        diags,
    );
}

// Model -> params

fn custom_unit_amount_params(custom: &CustomUnitAmountModel) -> PriceCustomUnitAmountParams {
    PriceCustomUnitAmountParams {
        maximum: custom.maximum.to_option(),
        minimum: custom.minimum.to_option(),
        preset: custom.preset.to_option(),
    }
}

fn tier_params(tier: &TierModel) -> PriceTierParams {
    let up_to = match tier.up_to {
        Attr::Null => Some(UpTo::Inf),
        Attr::Unknown => None,
        Attr::Value(quantity) => Some(UpTo::Quantity(quantity)),
    };
    PriceTierParams {
        flat_amount: tier.flat_amount.to_option(),
        flat_amount_decimal: tier.flat_amount_decimal.to_option(),
        unit_amount: tier.unit_amount.to_option(),
        unit_amount_decimal: tier.unit_amount_decimal.to_option(),
        up_to,
    }
}

fn tiers_params(tiers: &Attr<Vec<TierModel>>) -> Option<Vec<PriceTierParams>> {
    tiers.value().map(|tiers| tiers.iter().map(tier_params).collect())
}

fn currency_option_params(option: &PriceCurrencyOptionModel) -> PriceCurrencyOptionParams {
    PriceCurrencyOptionParams {
        custom_unit_amount: option.custom_unit_amount.value().map(custom_unit_amount_params),
        tax_behavior: option.tax_behavior.to_option(),
        tiers: tiers_params(&option.tiers),
        unit_amount: option.unit_amount.to_option(),
        unit_amount_decimal: option.unit_amount_decimal.to_option(),
    }
}

/// Builds create params from a plan.
///
/// The `top_level` currency option supplies the price's own amounts, tax
/// behavior and tiers, and its key becomes `currency`. Fields the option
/// leaves unset keep their top-level values.
#[must_use]
pub fn build_create_params(plan: &PriceModel) -> PriceParams {
    let mut params = PriceParams {
        active: plan.active.to_option(),
        billing_scheme: plan.billing_scheme.to_option(),
        currency: plan.currency.to_option(),
        custom_unit_amount: plan.custom_unit_amount.value().map(custom_unit_amount_params),
        lookup_key: plan.lookup_key.to_option(),
        metadata: plan.metadata.to_option().unwrap_or_default(),
        nickname: plan.nickname.to_option(),
        product: plan.product.to_option(),
        recurring: plan.recurring.value().map(|r| PriceRecurringParams {
            interval: r.interval.to_option(),
            aggregate_usage: r.aggregate_usage.to_option(),
            interval_count: r.interval_count.to_option(),
            meter: r.meter.to_option(),
            usage_type: r.usage_type.to_option(),
        }),
        tax_behavior: plan.tax_behavior.to_option(),
        tiers: tiers_params(&plan.tiers),
        tiers_mode: plan.tiers_mode.to_option(),
        transform_quantity: plan.transform_quantity.value().map(|t| {
            PriceTransformQuantityParams {
                divide_by: t.divide_by.to_option(),
                round: t.round.to_option(),
            }
        }),
        unit_amount: plan.unit_amount.to_option(),
        unit_amount_decimal: plan.unit_amount_decimal.to_option(),
        ..Default::default()
    };

    if let Some(options) = plan.currency_options.value() {
        let mut per_currency = BTreeMap::new();
        for (currency, option) in options {
            let option_params = currency_option_params(option);
            if option.top_level == Attr::Value(true) {
                params.currency = Some(currency.clone());
                if option_params.custom_unit_amount.is_some() {
                    params.custom_unit_amount = option_params.custom_unit_amount;
                }
                if option_params.tax_behavior.is_some() {
                    params.tax_behavior = option_params.tax_behavior;
                }
                if option_params.tiers.is_some() {
                    params.tiers = option_params.tiers;
                }
                if option_params.unit_amount.is_some() {
                    params.unit_amount = option_params.unit_amount;
                }
                if option_params.unit_amount_decimal.is_some() {
                    params.unit_amount_decimal = option_params.unit_amount_decimal;
                }
            } else {
                per_currency.insert(currency.clone(), option_params);
            }
        }
        params.currency_options = Some(per_currency);
    }

    params
}

/// Builds the change-set between state and plan.
///
/// Only fields Stripe allows to change are diffed. Currency options are
/// addition-only.
#[must_use]
pub fn build_update_params(state: &PriceModel, plan: &PriceModel) -> PriceParams {
    let currency_options = if plan.currency_options == state.currency_options {
        None
    } else {
        plan.currency_options.value().and_then(|planned| {
            let existing = state.currency_options.value();
            let added: BTreeMap<_, _> = planned
                .iter()
                .filter(|(currency, _)| existing.map_or(true, |e| !e.contains_key(*currency)))
                .map(|(currency, option)| (currency.clone(), currency_option_params(option)))
                .collect();
            (!added.is_empty()).then_some(added)
        })
    };

    PriceParams {
        active: changed_value(&state.active, &plan.active),
        currency_options,
        lookup_key: changed_clearable(&state.lookup_key, &plan.lookup_key),
        metadata: metadata_changes(&state.metadata, &plan.metadata),
        nickname: changed_clearable(&state.nickname, &plan.nickname),
        tax_behavior: changed_value(&state.tax_behavior, &plan.tax_behavior),
        ..Default::default()
    }
}

fn expanded(mut params: PriceParams) -> PriceParams {
    for field in EXPAND {
        params.add_expand(field);
    }
    params
}

/// Handler for `stripe_price`.
#[derive(Debug)]
pub struct PriceResource<C = StripeClient> {
    client: Arc<C>,
}

impl<C: BillingApi> PriceResource<C> {
    /// Creates a handler that calls Stripe through `client`.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Creates a price.
    pub async fn create(&self, req: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut plan) = decode::<PriceModel>(&req.plan, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let params = expanded(build_create_params(&plan));
        let price = match self.client.create::<Price>(&params).await {
            Ok(price) => price,
            Err(err) => {
                client_error(&mut diags, "create", Price::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        plan.id = Attr::Value(price.id.clone());
        populate_model(&mut plan, &price, &mut diags);

        tracing::trace!(resource = TYPE_NAME, id = %price.id, "created a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Refreshes a price.
    pub async fn read(&self, req: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut state) = decode::<PriceModel>(&req.state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let id = state.id.to_option().unwrap_or_default();
        let params = expanded(PriceParams::default());
        match self.client.get::<Price>(&id, &params).await {
            Ok(price) => populate_model(&mut state, &price, &mut diags),
            Err(err) => {
                client_error(&mut diags, "read", Price::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "read a resource");
        StateResponse::from_model(state, diags)
    }

    /// Sends the changed fields of a price.
    pub async fn update(&self, req: UpdateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let state = decode::<PriceModel>(&req.state, &mut diags);
        let plan = decode::<PriceModel>(&req.plan, &mut diags);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return StateResponse::failed(diags);
        };

        let params = expanded(build_update_params(&state, &plan));
        let id = plan.id.to_option().unwrap_or_default();
        match self.client.update::<Price>(&id, &params).await {
            Ok(price) => populate_model(&mut plan, &price, &mut diags),
            Err(err) => {
                client_error(&mut diags, "update", Price::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "updated a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Always fails: Stripe has no way to delete a price.
    pub async fn delete(&self, _req: DeleteRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        diags.add_error(
            "Client Error",
            "Stripe API does not support deleting prices. Please archive the price instead.",
        );
        diags
    }

    /// Adopts an existing price.
    pub async fn import(&self, req: ImportRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let params = expanded(PriceParams::default());
        let price = match self.client.get::<Price>(&req.id, &params).await {
            Ok(price) => price,
            Err(err) => {
                client_error(&mut diags, "import", Price::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        let mut state = PriceModel {
            id: Attr::Value(req.id.clone()),
            ..Default::default()
        };
        populate_model(&mut state, &price, &mut diags);

        tracing::trace!(resource = TYPE_NAME, id = %req.id, "imported a resource");
        StateResponse::from_model(state, diags)
    }

    /// Carries Stripe-computed attributes forward and flags immutable
    /// pricing fields for replacement.
    #[must_use]
    pub fn modify_plan(&self, req: ModifyPlanRequest) -> PlanResponse {
        let mut response = PlanResponse {
            plan: req.plan.clone(),
            ..Default::default()
        };
        if req.plan.is_null() || req.state.is_null() {
            return response;
        }
        let state = decode::<PriceModel>(&req.state, &mut response.diagnostics);
        let plan = decode::<PriceModel>(&req.plan, &mut response.diagnostics);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return response;
        };

        use_state_for_unknown(&state.id, &mut plan.id);
        use_state_for_unknown(&state.active, &mut plan.active);
        use_state_for_unknown(&state.billing_scheme, &mut plan.billing_scheme);
        use_state_for_unknown(&state.currency, &mut plan.currency);
        use_state_for_unknown(&state.currency_options, &mut plan.currency_options);
        use_state_for_unknown(&state.tax_behavior, &mut plan.tax_behavior);
        use_state_for_unknown(&state.unit_amount, &mut plan.unit_amount);
        use_state_for_unknown(&state.unit_amount_decimal, &mut plan.unit_amount_decimal);

        let replace = &mut response.requires_replace;
        replace_if_changed(replace, "billing_scheme", &state.billing_scheme, &plan.billing_scheme);
        replace_if_changed(replace, "currency", &state.currency, &plan.currency);
        replace_if_changed(
            replace,
            "custom_unit_amount",
            &state.custom_unit_amount,
            &plan.custom_unit_amount,
        );
        replace_if_changed(replace, "product", &state.product, &plan.product);
        replace_if_changed(replace, "recurring", &state.recurring, &plan.recurring);
        replace_if_changed(replace, "tiers", &state.tiers, &plan.tiers);
        replace_if_changed(replace, "tiers_mode", &state.tiers_mode, &plan.tiers_mode);
        replace_if_changed(
            replace,
            "transform_quantity",
            &state.transform_quantity,
            &plan.transform_quantity,
        );
        replace_if_changed(replace, "unit_amount", &state.unit_amount, &plan.unit_amount);
        replace_if_changed(
            replace,
            "unit_amount_decimal",
            &state.unit_amount_decimal,
            &plan.unit_amount_decimal,
        );

        response.plan = Attr::Value(plan.into_value());
        response
    }

    /// Checks enumerated values, tier bounds, metadata limits and
    /// conflicting amount settings.
    #[must_use]
    pub fn validate_config(&self, req: ValidateConfigRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(config) = decode::<PriceModel>(&req.config, &mut diags) else {
            return diags;
        };

        validators::one_of(
            &mut diags,
            AttributePath::root("billing_scheme"),
            &config.billing_scheme,
            &["per_unit", "tiered"],
        );
        validate_tax_behavior(&mut diags, AttributePath::root("tax_behavior"), &config.tax_behavior);
        validators::one_of(
            &mut diags,
            AttributePath::root("tiers_mode"),
            &config.tiers_mode,
            &["graduated", "volume"],
        );

        if let Some(recurring) = config.recurring.value() {
            let path = AttributePath::root("recurring");
            validators::one_of(
                &mut diags,
                path.attribute("interval"),
                &recurring.interval,
                &["day", "week", "month", "year"],
            );
            validators::one_of(
                &mut diags,
                path.attribute("aggregate_usage"),
                &recurring.aggregate_usage,
                &["last_during_period", "last_ever", "max", "sum"],
            );
            validators::at_least(&mut diags, path.attribute("interval_count"), &recurring.interval_count, 1);
            validators::one_of(
                &mut diags,
                path.attribute("usage_type"),
                &recurring.usage_type,
                &["licensed", "metered"],
            );
        }

        if let Some(transform) = config.transform_quantity.value() {
            let path = AttributePath::root("transform_quantity");
            validators::at_least(&mut diags, path.attribute("divide_by"), &transform.divide_by, 1);
            validators::one_of(&mut diags, path.attribute("round"), &transform.round, &["up", "down"]);
        }

        validate_tiers(&mut diags, &AttributePath::root("tiers"), &config.tiers);
        if let Some(options) = config.currency_options.value() {
            for (currency, option) in options {
                let path = AttributePath::root("currency_options").key(currency.as_str());
                validate_tax_behavior(&mut diags, path.attribute("tax_behavior"), &option.tax_behavior);
                validate_tiers(&mut diags, &path.attribute("tiers"), &option.tiers);
                validators::conflicts_with(
                    &mut diags,
                    path.attribute("custom_unit_amount"),
                    !option.custom_unit_amount.is_null(),
                    "unit_amount",
                    !option.unit_amount.is_null() || !option.unit_amount_decimal.is_null(),
                );
            }
        }

        validators::metadata(&mut diags, &config.metadata);

        let currency_options_set = !config.currency_options.is_null();
        let unit_amount_set = !config.unit_amount.is_null();
        let unit_amount_decimal_set = !config.unit_amount_decimal.is_null();
        validators::conflicts_with(
            &mut diags,
            AttributePath::root("currency"),
            !config.currency.is_null(),
            "currency_options",
            currency_options_set,
        );
        let currency_options = AttributePath::root("currency_options");
        validators::conflicts_with(
            &mut diags,
            currency_options.clone(),
            currency_options_set,
            "unit_amount",
            unit_amount_set,
        );
        validators::conflicts_with(
            &mut diags,
            currency_options,
            currency_options_set,
            "unit_amount_decimal",
            unit_amount_decimal_set,
        );
        let custom_unit_amount = AttributePath::root("custom_unit_amount");
        let custom_set = !config.custom_unit_amount.is_null();
        validators::conflicts_with(
            &mut diags,
            custom_unit_amount.clone(),
            custom_set,
            "unit_amount",
            unit_amount_set,
        );
        validators::conflicts_with(
            &mut diags,
            custom_unit_amount,
            custom_set,
            "unit_amount_decimal",
            unit_amount_decimal_set,
        );
        validators::conflicts_with(
            &mut diags,
            AttributePath::root("transform_quantity"),
            !config.transform_quantity.is_null(),
            "tiers",
            !config.tiers.is_null(),
        );
        diags
    }
}

fn validate_tax_behavior(diags: &mut Diagnostics, path: AttributePath, value: &Attr<String>) {
    validators::one_of(diags, path, value, &["exclusive", "inclusive", "unspecified"]);
}

fn validate_tiers(diags: &mut Diagnostics, path: &AttributePath, tiers: &Attr<Vec<TierModel>>) {
    let Some(tiers) = tiers.value() else {
        return;
    };
    for (i, tier) in tiers.iter().enumerate() {
        let tier_path = path.index(i);
        validators::conflicts_with(
            diags,
            tier_path.attribute("flat_amount"),
            !tier.flat_amount.is_null(),
            "flat_amount_decimal",
            !tier.flat_amount_decimal.is_null(),
        );
        validators::conflicts_with(
            diags,
            tier_path.attribute("unit_amount"),
            !tier.unit_amount.is_null(),
            "unit_amount_decimal",
            !tier.unit_amount_decimal.is_null(),
        );
        validators::at_least(diags, tier_path.attribute("up_to"), &tier.up_to, 0);
    }
}
