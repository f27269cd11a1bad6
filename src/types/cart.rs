//! Cart types as submitted by the storefront
//!
//! The storefront sends loosely typed JSON. Item fields are kept as raw values
//! and only coerced when a provider line item is built, mirroring the lenient
//! numeric conversion the storefront has always relied on.

use super::constants::checkout::EMPTY_CART_MESSAGE;
use crate::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// A single entry of the submitted cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartItem {
    /// Display title, passed through untouched
    pub title: Option<Value>,
    /// Requested quantity as submitted
    pub quantity: Option<Value>,
    /// Unit price as submitted
    pub price: Option<Value>,
}

impl CartItem {
    /// Read an item from an arbitrary JSON value.
    ///
    /// Non-object values produce an item with every field absent.
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(fields) => Self {
                title: fields.get("title").cloned(),
                quantity: fields.get("quantity").cloned(),
                price: fields.get("price").cloned(),
            },
            None => Self::default(),
        }
    }

    /// Quantity coerced to a number, `None` when it cannot be coerced
    pub fn coerced_quantity(&self) -> Option<Decimal> {
        coerce_number(self.quantity.as_ref())
    }

    /// Unit price coerced to a number, `None` when it cannot be coerced
    pub fn coerced_price(&self) -> Option<Decimal> {
        coerce_number(self.price.as_ref())
    }
}

/// An ordered, non-empty list of cart items
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceRequest {
    pub items: Vec<CartItem>,
}

impl PreferenceRequest {
    /// Parse a request body.
    ///
    /// Fails with [`CheckoutError::InvalidCart`] when `items` is absent, is
    /// not an array, or is empty. Individual items are not validated.
    pub fn from_value(body: &Value) -> Result<Self> {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .ok_or_else(|| CheckoutError::invalid_cart(EMPTY_CART_MESSAGE))?;

        Ok(Self {
            items: items.iter().map(CartItem::from_value).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Coerce a JSON value to a number the way a JavaScript `Number()` call would.
///
/// A missing value, an object, or an unparseable string yields `None`.
pub fn coerce_number(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null => Some(Decimal::ZERO),
        Value::Bool(true) => Some(Decimal::ONE),
        Value::Bool(false) => Some(Decimal::ZERO),
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => coerce_str(text),
        Value::Array(values) => match values.as_slice() {
            [] => Some(Decimal::ZERO),
            [Value::Null] => Some(Decimal::ZERO),
            [Value::Number(number)] => parse_decimal(&number.to_string()),
            [Value::String(text)] => coerce_str(text),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

fn coerce_str(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    parse_decimal(trimmed)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    // Digit separators are not numeric syntax here
    if text.contains('_') {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
