//! The Stripe price object.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::{nullable, Expandable};
use crate::api::form::{field_key, Form, FormParams};
use crate::api::RemoteResource;

/// A price, as returned by Stripe.
///
/// `currency_options` and `tiers` are only populated when the request
/// expanded them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Price {
    /// Unique identifier.
    pub id: String,
    /// Whether the price can be used for new purchases.
    pub active: bool,
    /// `per_unit` or `tiered`.
    #[serde(deserialize_with = "nullable")]
    pub billing_scheme: String,
    /// Three-letter ISO currency code.
    #[serde(deserialize_with = "nullable")]
    pub currency: String,
    /// Pricing per additional currency.
    #[serde(deserialize_with = "nullable")]
    pub currency_options: BTreeMap<String, PriceCurrencyOption>,
    /// Customer-chosen amount settings.
    pub custom_unit_amount: Option<PriceCustomUnitAmount>,
    /// Lookup key for retrieving prices dynamically.
    #[serde(deserialize_with = "nullable")]
    pub lookup_key: String,
    /// Key-value metadata.
    #[serde(deserialize_with = "nullable")]
    pub metadata: BTreeMap<String, String>,
    /// Internal description.
    #[serde(deserialize_with = "nullable")]
    pub nickname: String,
    /// The product this price belongs to.
    pub product: Option<Expandable>,
    /// Billing recurrence, for subscription prices.
    pub recurring: Option<PriceRecurring>,
    /// `inclusive`, `exclusive` or `unspecified`.
    #[serde(deserialize_with = "nullable")]
    pub tax_behavior: String,
    /// Pricing tiers, for `tiered` prices.
    #[serde(deserialize_with = "nullable")]
    pub tiers: Vec<PriceTier>,
    /// `graduated` or `volume`.
    #[serde(deserialize_with = "nullable")]
    pub tiers_mode: String,
    /// Quantity transformation before billing.
    pub transform_quantity: Option<PriceTransformQuantity>,
    /// Unit amount in the smallest currency unit.
    #[serde(deserialize_with = "nullable")]
    pub unit_amount: i64,
    /// Unit amount as a decimal string with up to 12 decimal places.
    #[serde(deserialize_with = "nullable")]
    pub unit_amount_decimal: String,
}

/// Pricing for one currency of a multi-currency price.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceCurrencyOption {
    /// Customer-chosen amount settings.
    pub custom_unit_amount: Option<PriceCustomUnitAmount>,
    /// `inclusive`, `exclusive` or `unspecified`.
    #[serde(deserialize_with = "nullable")]
    pub tax_behavior: String,
    /// Pricing tiers.
    #[serde(deserialize_with = "nullable")]
    pub tiers: Vec<PriceTier>,
    /// Unit amount in the smallest currency unit.
    #[serde(deserialize_with = "nullable")]
    pub unit_amount: i64,
    /// Unit amount as a decimal string.
    #[serde(deserialize_with = "nullable")]
    pub unit_amount_decimal: String,
}

/// Bounds for a customer-chosen amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceCustomUnitAmount {
    /// Largest amount the customer may choose.
    #[serde(deserialize_with = "nullable")]
    pub maximum: i64,
    /// Smallest amount the customer may choose.
    #[serde(deserialize_with = "nullable")]
    pub minimum: i64,
    /// Amount pre-filled for the customer.
    #[serde(deserialize_with = "nullable")]
    pub preset: i64,
}

/// Billing recurrence of a price.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceRecurring {
    /// `day`, `week`, `month` or `year`.
    #[serde(deserialize_with = "nullable")]
    pub interval: String,
    /// Usage aggregation for metered prices.
    #[serde(deserialize_with = "nullable")]
    pub aggregate_usage: String,
    /// Number of intervals between billings.
    #[serde(deserialize_with = "nullable")]
    pub interval_count: i64,
    /// Billing meter ID for metered prices.
    #[serde(deserialize_with = "nullable")]
    pub meter: String,
    /// `licensed` or `metered`.
    #[serde(deserialize_with = "nullable")]
    pub usage_type: String,
}

/// One tier of a tiered price.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceTier {
    /// Flat amount charged for the tier.
    #[serde(deserialize_with = "nullable")]
    pub flat_amount: i64,
    /// Flat amount as a decimal string.
    #[serde(deserialize_with = "nullable")]
    pub flat_amount_decimal: String,
    /// Per-unit amount for the tier.
    #[serde(deserialize_with = "nullable")]
    pub unit_amount: i64,
    /// Per-unit amount as a decimal string.
    #[serde(deserialize_with = "nullable")]
    pub unit_amount_decimal: String,
    /// Upper bound of the tier. `None` is the unbounded last tier.
    pub up_to: Option<i64>,
}

/// Quantity transformation applied before billing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceTransformQuantity {
    /// Divisor applied to the quantity.
    #[serde(deserialize_with = "nullable")]
    pub divide_by: i64,
    /// `up` or `down`.
    #[serde(deserialize_with = "nullable")]
    pub round: String,
}

impl RemoteResource for Price {
    type Params = PriceParams;

    const NAME: &'static str = "price";
    const PLURAL: &'static str = "prices";
}

/// Params for creating, retrieving or updating a price.
///
/// Most pricing fields are immutable after creation. Updates may only
/// change `active`, `currency_options`, `lookup_key`, `metadata`,
/// `nickname` and `tax_behavior`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceParams {
    /// Whether the price can be used for new purchases.
    pub active: Option<bool>,
    /// `per_unit` or `tiered`.
    pub billing_scheme: Option<String>,
    /// Three-letter ISO currency code.
    pub currency: Option<String>,
    /// Pricing per additional currency.
    pub currency_options: Option<BTreeMap<String, PriceCurrencyOptionParams>>,
    /// Customer-chosen amount settings.
    pub custom_unit_amount: Option<PriceCustomUnitAmountParams>,
    /// Lookup key. `""` clears it.
    pub lookup_key: Option<String>,
    /// Metadata entries to set. An empty value deletes the key.
    pub metadata: BTreeMap<String, String>,
    /// Internal description. `""` clears it.
    pub nickname: Option<String>,
    /// ID of the product this price belongs to.
    pub product: Option<String>,
    /// Billing recurrence.
    pub recurring: Option<PriceRecurringParams>,
    /// `inclusive`, `exclusive` or `unspecified`.
    pub tax_behavior: Option<String>,
    /// Pricing tiers.
    pub tiers: Option<Vec<PriceTierParams>>,
    /// `graduated` or `volume`.
    pub tiers_mode: Option<String>,
    /// Quantity transformation.
    pub transform_quantity: Option<PriceTransformQuantityParams>,
    /// Unit amount in the smallest currency unit.
    pub unit_amount: Option<i64>,
    /// Unit amount with decimal precision.
    pub unit_amount_decimal: Option<f64>,
    /// Response fields to expand.
    pub expand: Vec<String>,
}

impl PriceParams {
    /// Sets one metadata entry.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Requests expansion of a response field.
    pub fn add_expand(&mut self, field: impl Into<String>) {
        self.expand.push(field.into());
    }
}

impl FormParams for PriceParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("active"), self.active.as_ref());
        form.append_opt(&key("billing_scheme"), self.billing_scheme.as_ref());
        form.append_opt(&key("currency"), self.currency.as_ref());
        if let Some(options) = &self.currency_options {
            form.append_nested_map(&key("currency_options"), options);
        }
        if let Some(custom) = &self.custom_unit_amount {
            form.append_nested(&key("custom_unit_amount"), custom);
        }
        form.append_opt(&key("lookup_key"), self.lookup_key.as_ref());
        form.append_map(&key("metadata"), &self.metadata);
        form.append_opt(&key("nickname"), self.nickname.as_ref());
        form.append_opt(&key("product"), self.product.as_ref());
        if let Some(recurring) = &self.recurring {
            form.append_nested(&key("recurring"), recurring);
        }
        form.append_opt(&key("tax_behavior"), self.tax_behavior.as_ref());
        if let Some(tiers) = &self.tiers {
            form.append_nested_list(&key("tiers"), tiers);
        }
        form.append_opt(&key("tiers_mode"), self.tiers_mode.as_ref());
        if let Some(transform) = &self.transform_quantity {
            form.append_nested(&key("transform_quantity"), transform);
        }
        form.append_opt(&key("unit_amount"), self.unit_amount.as_ref());
        form.append_opt(&key("unit_amount_decimal"), self.unit_amount_decimal.as_ref());
        if !self.expand.is_empty() {
            form.append_list(&key("expand"), &self.expand);
        }
    }
}

/// Pricing for one currency of a multi-currency price.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceCurrencyOptionParams {
    /// Customer-chosen amount settings.
    pub custom_unit_amount: Option<PriceCustomUnitAmountParams>,
    /// `inclusive`, `exclusive` or `unspecified`.
    pub tax_behavior: Option<String>,
    /// Pricing tiers.
    pub tiers: Option<Vec<PriceTierParams>>,
    /// Unit amount in the smallest currency unit.
    pub unit_amount: Option<i64>,
    /// Unit amount with decimal precision.
    pub unit_amount_decimal: Option<f64>,
}

impl FormParams for PriceCurrencyOptionParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        if let Some(custom) = &self.custom_unit_amount {
            form.append_nested(&key("custom_unit_amount"), custom);
        }
        form.append_opt(&key("tax_behavior"), self.tax_behavior.as_ref());
        if let Some(tiers) = &self.tiers {
            form.append_nested_list(&key("tiers"), tiers);
        }
        form.append_opt(&key("unit_amount"), self.unit_amount.as_ref());
        form.append_opt(&key("unit_amount_decimal"), self.unit_amount_decimal.as_ref());
    }
}

/// Bounds for a customer-chosen amount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceCustomUnitAmountParams {
    /// Largest amount the customer may choose.
    pub maximum: Option<i64>,
    /// Smallest amount the customer may choose.
    pub minimum: Option<i64>,
    /// Amount pre-filled for the customer.
    pub preset: Option<i64>,
}

impl FormParams for PriceCustomUnitAmountParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append(key("enabled"), true);
        form.append_opt(&key("maximum"), self.maximum.as_ref());
        form.append_opt(&key("minimum"), self.minimum.as_ref());
        form.append_opt(&key("preset"), self.preset.as_ref());
    }
}

/// Billing recurrence of a price.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceRecurringParams {
    /// `day`, `week`, `month` or `year`.
    pub interval: Option<String>,
    /// Usage aggregation for metered prices.
    pub aggregate_usage: Option<String>,
    /// Number of intervals between billings.
    pub interval_count: Option<i64>,
    /// Billing meter ID.
    pub meter: Option<String>,
    /// `licensed` or `metered`.
    pub usage_type: Option<String>,
}

impl FormParams for PriceRecurringParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("interval"), self.interval.as_ref());
        form.append_opt(&key("aggregate_usage"), self.aggregate_usage.as_ref());
        form.append_opt(&key("interval_count"), self.interval_count.as_ref());
        form.append_opt(&key("meter"), self.meter.as_ref());
        form.append_opt(&key("usage_type"), self.usage_type.as_ref());
    }
}

/// Upper bound of a price tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpTo {
    /// The unbounded last tier.
    Inf,
    /// Tier ends at this quantity.
    Quantity(i64),
}

impl fmt::Display for UpTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inf => f.write_str("inf"),
            Self::Quantity(n) => write!(f, "{n}"),
        }
    }
}

/// One tier of a tiered price.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceTierParams {
    /// Flat amount charged for the tier.
    pub flat_amount: Option<i64>,
    /// Flat amount as a decimal string.
    pub flat_amount_decimal: Option<String>,
    /// Per-unit amount.
    pub unit_amount: Option<i64>,
    /// Per-unit amount as a decimal string.
    pub unit_amount_decimal: Option<String>,
    /// Upper bound of the tier.
    pub up_to: Option<UpTo>,
}

impl FormParams for PriceTierParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("flat_amount"), self.flat_amount.as_ref());
        form.append_opt(&key("flat_amount_decimal"), self.flat_amount_decimal.as_ref());
        form.append_opt(&key("unit_amount"), self.unit_amount.as_ref());
        form.append_opt(&key("unit_amount_decimal"), self.unit_amount_decimal.as_ref());
        form.append_opt(&key("up_to"), self.up_to.as_ref());
    }
}

/// Quantity transformation applied before billing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceTransformQuantityParams {
    /// Divisor applied to the quantity.
    pub divide_by: Option<i64>,
    /// `up` or `down`.
    pub round: Option<String>,
}

impl FormParams for PriceTransformQuantityParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("divide_by"), self.divide_by.as_ref());
        form.append_opt(&key("round"), self.round.as_ref());
    }
}
