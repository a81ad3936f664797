//! Stripe objects and their request params.
//!
//! Response objects follow Stripe's zero-value convention: a field that is
//! absent or `null` in the JSON deserializes to its type's default (empty
//! string, `0`, empty collection). Params use `Option` so that an unset
//! field is omitted from the request entirely.

mod coupon;
mod price;
mod product;
mod webhook_endpoint;

pub use coupon::{Coupon, CouponAppliesTo, CouponAppliesToParams, CouponCurrencyOption, CouponCurrencyOptionParams, CouponParams};
pub use price::{
    Price, PriceCurrencyOption, PriceCurrencyOptionParams, PriceCustomUnitAmount,
    PriceCustomUnitAmountParams, PriceParams, PriceRecurring, PriceRecurringParams, PriceTier,
    PriceTierParams, PriceTransformQuantity, PriceTransformQuantityParams, UpTo,
};
pub use product::{
    Product, ProductMarketingFeature, ProductMarketingFeatureParams, ProductPackageDimensions,
    ProductPackageDimensionsParams, ProductParams,
};
pub use webhook_endpoint::{WebhookEndpoint, WebhookEndpointParams};

use serde::{Deserialize, Deserializer};

/// A reference to another object that may or may not be expanded.
///
/// Stripe returns either the bare ID or the full object, depending on the
/// request's `expand` list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Expandable {
    /// An unexpanded reference.
    Id(String),
    /// An expanded object; only its ID is retained.
    Object {
        /// The referenced object's ID.
        id: String,
    },
}

impl Expandable {
    /// Returns the referenced object's ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

/// Deserializes `null` as the type's default value.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expandable_accepts_id_or_object() {
        let id: Expandable = serde_json::from_str(r#""price_1""#).unwrap();
        assert_eq!(id.id(), "price_1");

        let object: Expandable =
            serde_json::from_str(r#"{"id": "price_2", "object": "price", "active": true}"#).unwrap();
        assert_eq!(object.id(), "price_2");
    }
}
