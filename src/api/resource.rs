//! The billing API capability used by resource handlers.
//!
//! Handlers are written against [`BillingApi`] rather than a concrete HTTP
//! client. Each Stripe object type implements [`RemoteResource`], which ties
//! it to its params type and URL path.
//!
//! # Example
//!
//! ```rust,ignore
//! use stripe_provider::api::{BillingApi, Coupon, CouponParams};
//!
//! let mut params = CouponParams::default();
//! params.add_expand("currency_options");
//! let coupon: Coupon = client.get::<Coupon>("gold", &params).await?;
//! ```

use serde::de::DeserializeOwned;

use crate::api::{ApiError, FormParams};

/// A Stripe object type with standard CRUD endpoints.
///
/// Paths follow Stripe's layout:
///
/// | Operation | Method | Path |
/// |-----------|--------|------|
/// | create | `POST` | `/v1/{plural}` |
/// | get | `GET` | `/v1/{plural}/{id}` |
/// | update | `POST` | `/v1/{plural}/{id}` |
/// | delete | `DELETE` | `/v1/{plural}/{id}` |
pub trait RemoteResource: DeserializeOwned + Send + Sync {
    /// Params accepted by create, get and update.
    type Params: FormParams + Send + Sync;

    /// Human-readable singular name, used in error messages.
    const NAME: &'static str;

    /// The collection segment of the URL path (e.g., `"coupons"`).
    const PLURAL: &'static str;

    /// Returns the collection path.
    #[must_use]
    fn collection_path() -> String {
        format!("/v1/{}", Self::PLURAL)
    }

    /// Returns the path of one object.
    #[must_use]
    fn object_path(id: &str) -> String {
        format!("/v1/{}/{}", Self::PLURAL, urlencoding::encode(id))
    }
}

/// Access to the Stripe billing API.
///
/// Every method makes exactly one request. There are no retries.
#[allow(async_fn_in_trait)]
pub trait BillingApi: Send + Sync {
    /// Creates an object.
    async fn create<R: RemoteResource>(&self, params: &R::Params) -> Result<R, ApiError>;

    /// Retrieves an object. Only `expand` in `params` is meaningful.
    async fn get<R: RemoteResource>(&self, id: &str, params: &R::Params) -> Result<R, ApiError>;

    /// Applies a change-set to an object.
    async fn update<R: RemoteResource>(&self, id: &str, params: &R::Params)
        -> Result<R, ApiError>;

    /// Deletes an object.
    async fn delete<R: RemoteResource>(&self, id: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Coupon, WebhookEndpoint};

    #[test]
    fn test_paths() {
        assert_eq!(Coupon::collection_path(), "/v1/coupons");
        assert_eq!(Coupon::object_path("gold"), "/v1/coupons/gold");
        assert_eq!(
            WebhookEndpoint::object_path("we_1"),
            "/v1/webhook_endpoints/we_1"
        );
    }

    #[test]
    fn test_object_path_escapes_custom_ids() {
        assert_eq!(Coupon::object_path("summer sale"), "/v1/coupons/summer%20sale");
    }
}
