//! Preference types exchanged with the provider

use super::cart::CartItem;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Provider line item built from a [`CartItem`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceItem {
    /// Item title as submitted by the storefront
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    /// Coerced quantity; `None` is sent as `null`
    #[serde(serialize_with = "serialize_amount")]
    pub quantity: Option<Decimal>,
    /// Coerced unit price; `None` is sent as `null`
    #[serde(serialize_with = "serialize_amount")]
    pub unit_price: Option<Decimal>,
    /// ISO currency code
    pub currency_id: String,
}

impl PreferenceItem {
    /// Build a line item from a cart entry priced in `currency_id`
    pub fn from_cart_item(item: &CartItem, currency_id: impl Into<String>) -> Self {
        Self {
            title: item.title.clone(),
            quantity: item.coerced_quantity(),
            unit_price: item.coerced_price(),
            currency_id: currency_id.into(),
        }
    }
}

/// Redirect targets for each checkout outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

impl BackUrls {
    /// Build the three redirects for `<base><path>?status=<outcome>`
    pub fn for_route(base: &str, path: &str) -> Self {
        let base = base.trim_end_matches('/');
        let url = |status: &str| format!("{}{}?status={}", base, path, status);
        Self {
            success: url("success"),
            failure: url("failure"),
            pending: url("pending"),
        }
    }
}

/// Body sent to the provider's preference endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceBody {
    pub items: Vec<PreferenceItem>,
    pub back_urls: BackUrls,
    pub auto_return: String,
}

/// Provider response to a preference creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceResult {
    /// Opaque checkout session identifier
    pub id: String,
    /// Production checkout URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_point: Option<String>,
    /// Sandbox checkout URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_init_point: Option<String>,
}

/// Whole amounts go out as JSON integers, fractional ones as floats.
fn serialize_amount<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(amount) if amount.fract().is_zero() => match amount.to_i64() {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_none(),
        },
        Some(amount) => match amount.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_none(),
        },
        None => serializer.serialize_none(),
    }
}
