//! Core types for the checkout service
//!
//! This module defines the data exchanged with the storefront and with the
//! payment provider.
//!
//! # Architecture
//!
//! - [`cart`] - Cart items as submitted by the storefront, with numeric coercion
//! - [`preference`] - Preference bodies and results exchanged with the provider
//! - [`payment`] - Payment details and statuses returned by the payment lookup
//! - [`notification`] - Raw webhook payloads and payment id extraction
//! - [`provider`] - Provider client configuration
//! - [`constants`] - Provider endpoints and checkout defaults
//!
//! # Examples
//!
//! ```
//! use mp_checkout::types::{PreferenceItem, PreferenceRequest};
//! use serde_json::json;
//!
//! # fn example() -> mp_checkout::Result<()> {
//! let request = PreferenceRequest::from_value(&json!({
//!     "items": [{ "title": "Shirt", "quantity": 2, "price": "19.99" }]
//! }))?;
//!
//! let line = PreferenceItem::from_cart_item(&request.items[0], "ARS");
//! assert_eq!(line.currency_id, "ARS");
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod constants;
pub mod notification;
pub mod payment;
pub mod preference;
pub mod provider;

// Re-export commonly used types
pub use cart::{coerce_number, CartItem, PreferenceRequest};
pub use constants::{checkout, provider as provider_api};
pub use notification::{payment_id, NotificationRecord};
pub use payment::{PaymentDetails, PaymentStatus};
pub use preference::{BackUrls, PreferenceBody, PreferenceItem, PreferenceResult};
pub use provider::ProviderConfig;
