//! The `stripe_product` resource.
//!
//! Products describe the goods or services a merchant sells. `name` is
//! required and always concrete in state. `package_dimensions` is only
//! meaningful with all four measurements: a product missing any of them
//! reads back with no dimensions at all, and removing the block sends all
//! four as zero.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{
    BillingApi, Expandable, Product, ProductMarketingFeatureParams, ProductPackageDimensions,
    ProductPackageDimensionsParams, ProductParams, RemoteResource, StripeClient,
};
use crate::normalize::{list_null_if_empty, map_null_if_empty, string_null_if_empty};
use crate::resources::{
    changed_clearable, changed_list, changed_value, client_error, decode, metadata_changes,
    replace_if_changed, use_state_for_unknown, validators, CreateRequest, DeleteRequest,
    ImportRequest, ModifyPlanRequest, PlanResponse, ReadRequest, StateResponse, UpdateRequest,
    ValidateConfigRequest,
};
use crate::types::{read_object, Attr, AttrValue, AttributePath, Diagnostics, ObjectWriter, Value};

/// The orchestrator type name.
pub const TYPE_NAME: &str = "stripe_product";

/// Attributes of a product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductModel {
    pub id: Attr<String>,
    pub active: Attr<bool>,
    pub default_price: Attr<String>,
    pub description: Attr<String>,
    pub images: Attr<Vec<String>>,
    /// Feature names, in display order.
    pub marketing_features: Attr<Vec<String>>,
    pub metadata: Attr<BTreeMap<String, String>>,
    pub name: Attr<String>,
    pub package_dimensions: Attr<PackageDimensionsModel>,
    pub shippable: Attr<bool>,
    pub statement_descriptor: Attr<String>,
    pub tax_code: Attr<String>,
    pub unit_label: Attr<String>,
    pub url: Attr<String>,
}

/// Shipping dimensions of a product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageDimensionsModel {
    pub height: Attr<f64>,
    pub length: Attr<f64>,
    pub weight: Attr<f64>,
    pub width: Attr<f64>,
}

impl PackageDimensionsModel {
    /// Dimensions sent to unset a product's package dimensions.
    const CLEARED: ProductPackageDimensionsParams = ProductPackageDimensionsParams {
        height: Some(0.0),
        length: Some(0.0),
        weight: Some(0.0),
        width: Some(0.0),
    };

    fn from_remote(dimensions: Option<&ProductPackageDimensions>) -> Attr<Self> {
        match dimensions {
            Some(d) if d.height != 0.0 && d.length != 0.0 && d.weight != 0.0 && d.width != 0.0 => {
                Attr::Value(Self {
                    height: Attr::Value(d.height),
                    length: Attr::Value(d.length),
                    weight: Attr::Value(d.weight),
                    width: Attr::Value(d.width),
                })
            }
            _ => Attr::Null,
        }
    }

    fn to_params(&self) -> ProductPackageDimensionsParams {
        ProductPackageDimensionsParams {
            height: self.height.to_option(),
            length: self.length.to_option(),
            weight: self.weight.to_option(),
            width: self.width.to_option(),
        }
    }
}

impl AttrValue for PackageDimensionsModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            height: r.attr("height"),
            length: r.attr("length"),
            weight: r.attr("weight"),
            width: r.attr("width"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("height", self.height)
            .attr("length", self.length)
            .attr("weight", self.weight)
            .attr("width", self.width)
            .finish()
    }
}

impl AttrValue for ProductModel {
    const KIND: &'static str = "object";

    fn from_value(value: &Value, path: &AttributePath, diags: &mut Diagnostics) -> Attr<Self> {
        read_object(value, path, diags, |r| Self {
            id: r.attr("id"),
            active: r.attr("active"),
            default_price: r.attr("default_price"),
            description: r.attr("description"),
            images: r.attr("images"),
            marketing_features: r.attr("marketing_features"),
            metadata: r.attr("metadata"),
            name: r.attr("name"),
            package_dimensions: r.attr("package_dimensions"),
            shippable: r.attr("shippable"),
            statement_descriptor: r.attr("statement_descriptor"),
            tax_code: r.attr("tax_code"),
            unit_label: r.attr("unit_label"),
            url: r.attr("url"),
        })
    }

    fn into_value(self) -> Value {
        ObjectWriter::new()
            .attr("id", self.id)
            .attr("active", self.active)
            .attr("default_price", self.default_price)
            .attr("description", self.description)
            .attr("images", self.images)
            .attr("marketing_features", self.marketing_features)
            .attr("metadata", self.metadata)
            .attr("name", self.name)
            .attr("package_dimensions", self.package_dimensions)
            .attr("shippable", self.shippable)
            .attr("statement_descriptor", self.statement_descriptor)
            .attr("tax_code", self.tax_code)
            .attr("unit_label", self.unit_label)
            .attr("url", self.url)
            .finish()
    }
}

fn expandable_id(reference: Option<&Expandable>) -> Attr<String> {
    Attr::from_option(reference.map(|r| r.id().to_string()))
}

/// Copies a product into the model. `id` is left alone.
pub fn populate_model(model: &mut ProductModel, product: &Product) {
    model.active = Attr::Value(product.active);
    model.default_price = expandable_id(product.default_price.as_ref());
    model.description = string_null_if_empty(&product.description);
    model.images = list_null_if_empty(Attr::Value(product.images.clone()));
    model.marketing_features = list_null_if_empty(Attr::Value(
        product
            .marketing_features
            .iter()
            .map(|feature| feature.name.clone())
            .collect(),
    ));
    model.metadata = map_null_if_empty(Attr::Value(product.metadata.clone()));
    model.name = Attr::Value(product.name.clone());
    model.package_dimensions = PackageDimensionsModel::from_remote(product.package_dimensions.as_ref());
    model.shippable = Attr::Value(product.shippable);
    model.statement_descriptor = string_null_if_empty(&product.statement_descriptor);
    model.tax_code = expandable_id(product.tax_code.as_ref());
    model.unit_label = string_null_if_empty(&product.unit_label);
    model.url = string_null_if_empty(&product.url);
}

fn feature_params(names: Vec<String>) -> Vec<ProductMarketingFeatureParams> {
    names
        .into_iter()
        .map(|name| ProductMarketingFeatureParams { name: Some(name) })
        .collect()
}

/// Builds create params from a plan.
#[must_use]
pub fn build_create_params(plan: &ProductModel) -> ProductParams {
    ProductParams {
        id: plan.id.to_option(),
        active: plan.active.to_option(),
        default_price: plan.default_price.to_option(),
        description: plan.description.to_option(),
        images: plan.images.to_option(),
        marketing_features: plan.marketing_features.to_option().map(feature_params),
        metadata: plan.metadata.to_option().unwrap_or_default(),
        name: plan.name.to_option(),
        package_dimensions: plan
            .package_dimensions
            .value()
            .map(PackageDimensionsModel::to_params),
        shippable: plan.shippable.to_option(),
        statement_descriptor: plan.statement_descriptor.to_option(),
        tax_code: plan.tax_code.to_option(),
        unit_label: plan.unit_label.to_option(),
        url: plan.url.to_option(),
        expand: Vec::new(),
    }
}

/// Builds the change-set between state and plan.
#[must_use]
pub fn build_update_params(state: &ProductModel, plan: &ProductModel) -> ProductParams {
    let package_dimensions = if plan.package_dimensions == state.package_dimensions {
        None
    } else {
        match &plan.package_dimensions {
            Attr::Null => Some(PackageDimensionsModel::CLEARED),
            Attr::Unknown => None,
            Attr::Value(dimensions) => Some(dimensions.to_params()),
        }
    };

    ProductParams {
        active: changed_value(&state.active, &plan.active),
        default_price: changed_clearable(&state.default_price, &plan.default_price),
        description: changed_clearable(&state.description, &plan.description),
        images: changed_list(&state.images, &plan.images),
        marketing_features: changed_list(&state.marketing_features, &plan.marketing_features)
            .map(feature_params),
        metadata: metadata_changes(&state.metadata, &plan.metadata),
        name: changed_value(&state.name, &plan.name),
        package_dimensions,
        shippable: changed_value(&state.shippable, &plan.shippable),
        statement_descriptor: changed_clearable(
            &state.statement_descriptor,
            &plan.statement_descriptor,
        ),
        tax_code: changed_clearable(&state.tax_code, &plan.tax_code),
        unit_label: changed_clearable(&state.unit_label, &plan.unit_label),
        url: changed_clearable(&state.url, &plan.url),
        ..Default::default()
    }
}

/// Handler for `stripe_product`.
#[derive(Debug)]
pub struct ProductResource<C = StripeClient> {
    client: Arc<C>,
}

impl<C: BillingApi> ProductResource<C> {
    /// Creates a handler that calls Stripe through `client`.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Creates a product.
    pub async fn create(&self, req: CreateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut plan) = decode::<ProductModel>(&req.plan, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let params = build_create_params(&plan);
        let product = match self.client.create::<Product>(&params).await {
            Ok(product) => product,
            Err(err) => {
                client_error(&mut diags, "create", Product::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        plan.id = Attr::Value(product.id.clone());
        populate_model(&mut plan, &product);

        tracing::trace!(resource = TYPE_NAME, id = %product.id, "created a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Refreshes a product.
    pub async fn read(&self, req: ReadRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let Some(mut state) = decode::<ProductModel>(&req.state, &mut diags) else {
            return StateResponse::failed(diags);
        };

        let id = state.id.to_option().unwrap_or_default();
        match self.client.get::<Product>(&id, &ProductParams::default()).await {
            Ok(product) => populate_model(&mut state, &product),
            Err(err) => {
                client_error(&mut diags, "read", Product::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "read a resource");
        StateResponse::from_model(state, diags)
    }

    /// Sends the changed fields of a product.
    pub async fn update(&self, req: UpdateRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let state = decode::<ProductModel>(&req.state, &mut diags);
        let plan = decode::<ProductModel>(&req.plan, &mut diags);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return StateResponse::failed(diags);
        };

        let params = build_update_params(&state, &plan);
        let id = plan.id.to_option().unwrap_or_default();
        match self.client.update::<Product>(&id, &params).await {
            Ok(product) => populate_model(&mut plan, &product),
            Err(err) => {
                client_error(&mut diags, "update", Product::NAME, &err);
                return StateResponse::failed(diags);
            }
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "updated a resource");
        StateResponse::from_model(plan, diags)
    }

    /// Deletes a product.
    ///
    /// Stripe refuses to delete products that still have prices attached;
    /// that refusal is reported as a client error.
    pub async fn delete(&self, req: DeleteRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(state) = decode::<ProductModel>(&req.state, &mut diags) else {
            return diags;
        };

        let id = state.id.to_option().unwrap_or_default();
        if let Err(err) = self.client.delete::<Product>(&id).await {
            client_error(&mut diags, "delete", Product::NAME, &err);
            return diags;
        }

        tracing::trace!(resource = TYPE_NAME, id = %id, "deleted a resource");
        diags
    }

    /// Adopts an existing product.
    pub async fn import(&self, req: ImportRequest) -> StateResponse {
        let mut diags = Diagnostics::new();
        let product = match self.client.get::<Product>(&req.id, &ProductParams::default()).await {
            Ok(product) => product,
            Err(err) => {
                client_error(&mut diags, "import", Product::NAME, &err);
                return StateResponse::failed(diags);
            }
        };

        let mut state = ProductModel {
            id: Attr::Value(req.id.clone()),
            ..Default::default()
        };
        populate_model(&mut state, &product);

        tracing::trace!(resource = TYPE_NAME, id = %req.id, "imported a resource");
        StateResponse::from_model(state, diags)
    }

    /// Carries `id` forward and replaces the product when it changes.
    #[must_use]
    pub fn modify_plan(&self, req: ModifyPlanRequest) -> PlanResponse {
        let mut response = PlanResponse {
            plan: req.plan.clone(),
            ..Default::default()
        };
        if req.plan.is_null() || req.state.is_null() {
            return response;
        }
        let state = decode::<ProductModel>(&req.state, &mut response.diagnostics);
        let plan = decode::<ProductModel>(&req.plan, &mut response.diagnostics);
        let (Some(state), Some(mut plan)) = (state, plan) else {
            return response;
        };

        use_state_for_unknown(&state.id, &mut plan.id);
        replace_if_changed(&mut response.requires_replace, "id", &state.id, &plan.id);

        response.plan = Attr::Value(plan.into_value());
        response
    }

    /// Checks image and feature lists and metadata limits.
    #[must_use]
    pub fn validate_config(&self, req: ValidateConfigRequest) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(config) = decode::<ProductModel>(&req.config, &mut diags) else {
            return diags;
        };

        validators::list(&mut diags, &AttributePath::root("images"), &config.images, Some(8));
        let features = AttributePath::root("marketing_features");
        validators::list(&mut diags, &features, &config.marketing_features, Some(15));
        if let Some(names) = config.marketing_features.value() {
            for (i, name) in names.iter().enumerate() {
                validators::length_at_most(&mut diags, features.index(i), name, 80);
            }
        }
        validators::metadata(&mut diags, &config.metadata);
        diags
    }
}
