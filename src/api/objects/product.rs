//! The Stripe product object.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{nullable, Expandable};
use crate::api::form::{field_key, Form, FormParams};
use crate::api::RemoteResource;

/// A product, as returned by Stripe.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Unique identifier.
    pub id: String,
    /// Whether the product is available for purchase.
    pub active: bool,
    /// The default price, if one is set.
    pub default_price: Option<Expandable>,
    /// Description shown to customers.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Up to eight image URLs.
    #[serde(deserialize_with = "nullable")]
    pub images: Vec<String>,
    /// Features shown in pricing tables.
    #[serde(deserialize_with = "nullable")]
    pub marketing_features: Vec<ProductMarketingFeature>,
    /// Key-value metadata.
    #[serde(deserialize_with = "nullable")]
    pub metadata: BTreeMap<String, String>,
    /// Name shown to customers.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Shipping dimensions.
    pub package_dimensions: Option<ProductPackageDimensions>,
    /// Whether the product is shipped.
    #[serde(deserialize_with = "nullable")]
    pub shippable: bool,
    /// Extra text for credit card statements.
    #[serde(deserialize_with = "nullable")]
    pub statement_descriptor: String,
    /// Tax code, if one is set.
    pub tax_code: Option<Expandable>,
    /// Label for units of this product on receipts.
    #[serde(deserialize_with = "nullable")]
    pub unit_label: String,
    /// Public URL of the product.
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

/// A marketing feature of a product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductMarketingFeature {
    /// The feature's name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

/// Shipping dimensions of a product.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductPackageDimensions {
    /// Height in inches.
    pub height: f64,
    /// Length in inches.
    pub length: f64,
    /// Weight in ounces.
    pub weight: f64,
    /// Width in inches.
    pub width: f64,
}

impl RemoteResource for Product {
    type Params = ProductParams;

    const NAME: &'static str = "product";
    const PLURAL: &'static str = "products";
}

/// Params for creating or updating a product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductParams {
    /// Custom ID, only honoured on create.
    pub id: Option<String>,
    /// Whether the product is available for purchase.
    pub active: Option<bool>,
    /// ID of the default price. `""` unsets it.
    pub default_price: Option<String>,
    /// Description shown to customers. `""` clears it.
    pub description: Option<String>,
    /// Image URLs. An empty list clears them.
    pub images: Option<Vec<String>>,
    /// Marketing features. An empty list clears them.
    pub marketing_features: Option<Vec<ProductMarketingFeatureParams>>,
    /// Metadata entries to set. An empty value deletes the key.
    pub metadata: BTreeMap<String, String>,
    /// Name shown to customers.
    pub name: Option<String>,
    /// Shipping dimensions.
    pub package_dimensions: Option<ProductPackageDimensionsParams>,
    /// Whether the product is shipped.
    pub shippable: Option<bool>,
    /// Extra text for credit card statements.
    pub statement_descriptor: Option<String>,
    /// Tax code ID.
    pub tax_code: Option<String>,
    /// Label for units of this product on receipts.
    pub unit_label: Option<String>,
    /// Public URL of the product.
    pub url: Option<String>,
    /// Response fields to expand.
    pub expand: Vec<String>,
}

impl ProductParams {
    /// Sets one metadata entry.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Requests expansion of a response field.
    pub fn add_expand(&mut self, field: impl Into<String>) {
        self.expand.push(field.into());
    }
}

impl FormParams for ProductParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("id"), self.id.as_ref());
        form.append_opt(&key("active"), self.active.as_ref());
        form.append_opt(&key("default_price"), self.default_price.as_ref());
        form.append_opt(&key("description"), self.description.as_ref());
        if let Some(images) = &self.images {
            form.append_list(&key("images"), images);
        }
        if let Some(features) = &self.marketing_features {
            form.append_nested_list(&key("marketing_features"), features);
        }
        form.append_map(&key("metadata"), &self.metadata);
        form.append_opt(&key("name"), self.name.as_ref());
        if let Some(dimensions) = &self.package_dimensions {
            form.append_nested(&key("package_dimensions"), dimensions);
        }
        form.append_opt(&key("shippable"), self.shippable.as_ref());
        form.append_opt(&key("statement_descriptor"), self.statement_descriptor.as_ref());
        form.append_opt(&key("tax_code"), self.tax_code.as_ref());
        form.append_opt(&key("unit_label"), self.unit_label.as_ref());
        form.append_opt(&key("url"), self.url.as_ref());
        if !self.expand.is_empty() {
            form.append_list(&key("expand"), &self.expand);
        }
    }
}

/// A marketing feature of a product.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductMarketingFeatureParams {
    /// The feature's name.
    pub name: Option<String>,
}

impl FormParams for ProductMarketingFeatureParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        form.append_opt(&field_key(prefix, "name"), self.name.as_ref());
    }
}

/// Shipping dimensions of a product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductPackageDimensionsParams {
    /// Height in inches.
    pub height: Option<f64>,
    /// Length in inches.
    pub length: Option<f64>,
    /// Weight in ounces.
    pub weight: Option<f64>,
    /// Width in inches.
    pub width: Option<f64>,
}

impl FormParams for ProductPackageDimensionsParams {
    fn append_to(&self, prefix: &str, form: &mut Form) {
        let key = |field: &str| field_key(prefix, field);
        form.append_opt(&key("height"), self.height.as_ref());
        form.append_opt(&key("length"), self.length.as_ref());
        form.append_opt(&key("weight"), self.weight.as_ref());
        form.append_opt(&key("width"), self.width.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_expanded_and_unexpanded_references() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "prod_1",
                "active": true,
                "default_price": "price_1",
                "tax_code": {"id": "txcd_10000000", "object": "tax_code"},
                "description": null,
                "images": [],
                "marketing_features": [{"name": "Fast"}],
                "name": "Widget",
                "package_dimensions": null,
                "shippable": null,
                "url": null
            }"#,
        )
        .unwrap();

        assert_eq!(product.default_price.as_ref().map(Expandable::id), Some("price_1"));
        assert_eq!(product.tax_code.as_ref().map(Expandable::id), Some("txcd_10000000"));
        assert_eq!(product.description, "");
        assert_eq!(product.marketing_features[0].name, "Fast");
        assert!(product.package_dimensions.is_none());
        assert!(!product.shippable);
    }

    #[test]
    fn test_encodes_nested_fields() {
        let params = ProductParams {
            images: Some(vec![]),
            marketing_features: Some(vec![ProductMarketingFeatureParams {
                name: Some("Fast".to_string()),
            }]),
            package_dimensions: Some(ProductPackageDimensionsParams {
                height: Some(1.5),
                length: Some(2.0),
                weight: Some(0.5),
                width: Some(1.0),
            }),
            ..Default::default()
        };
        let form = params.to_form();
        assert_eq!(form.get("images"), Some(""));
        assert_eq!(form.get("marketing_features[0][name]"), Some("Fast"));
        assert_eq!(form.get("package_dimensions[height]"), Some("1.5"));
        assert_eq!(form.get("package_dimensions[length]"), Some("2"));
    }
}
