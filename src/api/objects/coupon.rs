//! The Stripe coupon object.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::nullable;
use crate::api::form::{field_key, Form, FormParams};
use crate::api::RemoteResource;

/// A coupon, as returned by Stripe.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Coupon {
    /// Unique identifier.
    pub id: String,
    /// Amount off in the smallest unit of `currency`.
    #[serde(deserialize_with = "nullable")]
    pub amount_off: i64,
    /// Products the coupon is restricted to.
    pub applies_to: Option<CouponAppliesTo>,
    /// Currency of `amount_off`.
    #[serde(deserialize_with = "nullable")]
    pub currency: String,
    /// Amount off per additional currency. Only returned when expanded.
    #[serde(deserialize_with = "nullable")]
    pub currency_options: BTreeMap<String, CouponCurrencyOption>,
    /// `forever`, `once` or `repeating`.
    #[serde(deserialize_with = "nullable")]
    pub duration: String,
    /// Number of months a `repeating` coupon applies.
    #[serde(deserialize_with = "nullable")]
    pub duration_in_months: i64,
    /// Maximum number of redemptions.
    #[serde(deserialize_with = "nullable")]
    pub max_redemptions: i64,
    /// Key-value metadata.
    #[serde(deserialize_with = "nullable")]
    pub metadata: BTreeMap<String, String>,
    /// Name shown to customers.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Percentage off.
    #[serde(deserialize_with = "nullable")]
    pub percent_off: f64,
    /// Unix timestamp after which the coupon can no longer be redeemed.
    #[serde(deserialize_with = "nullable")]
    pub redeem_by: i64,
}

/// Products a coupon is restricted to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CouponAppliesTo {
    /// Product IDs.
    #[serde(deserialize_with = "nullable")]
    pub products: Vec<String>,
}

/// A coupon's amount off in one currency.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CouponCurrencyOption {
    /// Amount off in the smallest currency unit.
    #[serde(deserialize_with = "nullable")]
    pub amount_off: i64,
}

impl RemoteResource for Coupon {
    type Params = CouponParams;

    const NAME: &'static str = "coupon";
    const PLURAL: &'static str = "coupons";
}

/// Params for creating, retrieving or updating a coupon.
///
/// Stripe only allows `currency_options`, `metadata` and `name` to change
/// after creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CouponParams {
    /// Custom ID, only honoured on create.
    pub id: Option<String>,
    /// Amount off in the smallest unit of `currency`.
    pub amount_off: Option<i64>,
    /// Products the coupon is restricted to.
    pub applies_to: Option<CouponAppliesToParams>,
    /// Currency of `amount_off`.
    pub currency: Option<String>,
    /// Amount off per additional currency.
    pub currency_options: Option<BTreeMap<String, CouponCurrencyOptionParams>>,
    /// `forever`, `once` or `repeating`.
    pub duration: Option<String>,
    /// Number of months a `repeating` coupon applies.
    pub duration_in_months: Option<i64>,
    /// Maximum number of redemptions.
    pub max_redemptions: Option<i64>,
    /// Metadata entries to set. An empty value deletes the key.
    pub metadata: BTreeMap<String, String>,
    /// Name shown to customers.
    pub name: Option<String>,
    /// Percentage off.
    pub percent_off: Option<f64>,
    /// Unix timestamp after which the coupon can no longer be redeemed.
    pub redeem_by: Option<i64>,
    /// Response fields to expand.
    pub expand: Vec<String>,
}

impl CouponParams {
    /// Sets one metadata entry.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Requests expansion of a response field.
    pub fn add_expand(&mut self, field: impl Into<String>) {
        self.expand.push(field.into());
    }
}

impl FormParams for CouponParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("id"), self.id.as_ref());
        form.append_opt(&key("amount_off"), self.amount_off.as_ref());
        if let Some(applies_to) = &self.applies_to {
            form.append_nested(&key("applies_to"), applies_to);
        }
        form.append_opt(&key("currency"), self.currency.as_ref());
        if let Some(options) = &self.currency_options {
            form.append_nested_map(&key("currency_options"), options);
        }
        form.append_opt(&key("duration"), self.duration.as_ref());
        form.append_opt(&key("duration_in_months"), self.duration_in_months.as_ref());
        form.append_opt(&key("max_redemptions"), self.max_redemptions.as_ref());
        form.append_map(&key("metadata"), &self.metadata);
        form.append_opt(&key("name"), self.name.as_ref());
        form.append_opt(&key("percent_off"), self.percent_off.as_ref());
        form.append_opt(&key("redeem_by"), self.redeem_by.as_ref());
        if !self.expand.is_empty() {
            form.append_list(&key("expand"), &self.expand);
        }
    }
}

/// Products a coupon is restricted to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CouponAppliesToParams {
    /// Product IDs.
    pub products: Vec<String>,
}

impl FormParams for CouponAppliesToParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        form.append_list(&field_key(prefix, "products"), &self.products);
    }
}

/// A coupon's amount off in one currency.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CouponCurrencyOptionParams {
    /// Amount off in the smallest currency unit.
    pub amount_off: Option<i64>,
}

impl FormParams for CouponCurrencyOptionParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        form.append_opt(&field_key(prefix, "amount_off"), self.amount_off.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_nulls_as_zero_values() {
        let coupon: Coupon = serde_json::from_str(
            r#"{
                "id": "gold",
                "object": "coupon",
                "amount_off": null,
                "currency": null,
                "duration": "forever",
                "max_redemptions": null,
                "metadata": {},
                "name": null,
                "percent_off": 25.5,
                "redeem_by": null,
                "valid": true
            }"#,
        )
        .unwrap();

        assert_eq!(coupon.id, "gold");
        assert_eq!(coupon.amount_off, 0);
        assert_eq!(coupon.currency, "");
        assert_eq!(coupon.name, "");
        assert!((coupon.percent_off - 25.5).abs() < f64::EPSILON);
        assert!(coupon.applies_to.is_none());
        assert!(coupon.currency_options.is_empty());
    }

    #[test]
    fn test_encodes_currency_options_and_expand() {
        let mut params = CouponParams {
            amount_off: Some(1000),
            currency: Some("usd".to_string()),
            ..Default::default()
        };
        params.currency_options = Some(BTreeMap::from([(
            "eur".to_string(),
            CouponCurrencyOptionParams {
                amount_off: Some(900),
            },
        )]));
        params.add_expand("currency_options");

        let form = params.to_form();
        assert_eq!(form.get("amount_off"), Some("1000"));
        assert_eq!(form.get("currency"), Some("usd"));
        assert_eq!(form.get("currency_options[eur][amount_off]"), Some("900"));
        assert_eq!(form.get("expand[0]"), Some("currency_options"));
    }

    #[test]
    fn test_encodes_applies_to_products() {
        let params = CouponParams {
            applies_to: Some(CouponAppliesToParams {
                products: vec!["prod_1".to_string(), "prod_2".to_string()],
            }),
            ..Default::default()
        };
        let form = params.to_form();
        assert_eq!(form.get("applies_to[products][0]"), Some("prod_1"));
        assert_eq!(form.get("applies_to[products][1]"), Some("prod_2"));
    }
}
