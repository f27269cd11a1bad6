//! Checkout preference creation
//!
//! Turns a storefront cart into a provider preference and returns the
//! provider's checkout session id.

use crate::provider::PaymentProvider;
use crate::types::checkout::{
    AUTO_RETURN_APPROVED, CART_PATH, DEFAULT_CURRENCY, DEFAULT_FRONTEND_URL,
};
use crate::types::{
    BackUrls, PreferenceBody, PreferenceItem, PreferenceRequest, PreferenceResult,
};
use crate::{CheckoutError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Settings applied to every preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Currency every line item is priced in
    pub currency_id: String,
    /// Frontend the buyer is sent back to
    pub frontend_url: String,
    /// Frontend route that receives the `status` query parameter
    pub return_path: String,
    /// Outcome on which the provider redirects without user action
    pub auto_return: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency_id: DEFAULT_CURRENCY.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            return_path: CART_PATH.to_string(),
            auto_return: AUTO_RETURN_APPROVED.to_string(),
        }
    }
}

impl CheckoutConfig {
    /// Set the currency code
    pub fn with_currency(mut self, currency_id: impl Into<String>) -> Self {
        self.currency_id = currency_id.into();
        self
    }

    /// Set the frontend URL
    pub fn with_frontend_url(mut self, frontend_url: impl Into<String>) -> Self {
        self.frontend_url = frontend_url.into();
        self
    }

    /// Validate the checkout configuration
    pub fn validate(&self) -> Result<()> {
        if self.currency_id.trim().is_empty() {
            return Err(CheckoutError::config("Currency code cannot be empty"));
        }

        url::Url::parse(&self.frontend_url).map_err(|e| {
            CheckoutError::config(format!(
                "Invalid frontend URL {}: {}",
                self.frontend_url, e
            ))
        })?;

        Ok(())
    }

    /// Redirect URLs for the three checkout outcomes
    pub fn back_urls(&self) -> BackUrls {
        BackUrls::for_route(&self.frontend_url, &self.return_path)
    }
}

/// Creates checkout preferences through a [`PaymentProvider`]
#[derive(Clone)]
pub struct PreferenceCreator {
    provider: Arc<dyn PaymentProvider>,
    config: Arc<CheckoutConfig>,
}

impl std::fmt::Debug for PreferenceCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceCreator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PreferenceCreator {
    pub fn new(provider: Arc<dyn PaymentProvider>, config: CheckoutConfig) -> Self {
        Self {
            provider,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Build the provider body for a parsed cart
    pub fn build_body(&self, request: &PreferenceRequest) -> PreferenceBody {
        PreferenceBody {
            items: request
                .items
                .iter()
                .map(|item| PreferenceItem::from_cart_item(item, &*self.config.currency_id))
                .collect(),
            back_urls: self.config.back_urls(),
            auto_return: self.config.auto_return.clone(),
        }
    }

    /// Validate a raw request body and create the preference.
    ///
    /// Returns [`CheckoutError::InvalidCart`] without calling the provider
    /// when the cart is missing or empty.
    pub async fn create(&self, body: &Value) -> Result<PreferenceResult> {
        let request = PreferenceRequest::from_value(body)?;
        let preference = self.build_body(&request);

        tracing::info!(
            items = preference.items.len(),
            currency = %self.config.currency_id,
            "Creating checkout preference"
        );

        self.provider.create_preference(&preference).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentDetails;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        bodies: Mutex<Vec<PreferenceBody>>,
    }

    #[async_trait]
    impl PaymentProvider for RecordingProvider {
        async fn create_preference(&self, body: &PreferenceBody) -> Result<PreferenceResult> {
            self.bodies.lock().unwrap().push(body.clone());
            Ok(PreferenceResult {
                id: "pref-1".to_string(),
                init_point: None,
                sandbox_init_point: None,
            })
        }

        async fn get_payment(&self, _payment_id: &str) -> Result<PaymentDetails> {
            unreachable!("preference creation never looks up payments")
        }
    }

    fn creator(config: CheckoutConfig) -> (PreferenceCreator, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::default());
        (PreferenceCreator::new(provider.clone(), config), provider)
    }

    #[test]
    fn test_checkout_config_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.currency_id, "ARS");
        assert_eq!(config.auto_return, "approved");
        assert_eq!(
            config.back_urls().pending,
            "http://localhost:3001/carrito?status=pending"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_checkout_config_validation() {
        assert!(CheckoutConfig::default().with_currency(" ").validate().is_err());
        assert!(CheckoutConfig::default()
            .with_frontend_url("localhost")
            .validate()
            .is_err());
    }

    #[test]
    fn test_build_body_maps_every_item() {
        let (creator, _) = creator(CheckoutConfig::default().with_currency("BRL"));
        let request = PreferenceRequest::from_value(&json!({
            "items": [
                { "title": "Shirt", "quantity": 2, "price": "19.99" },
                { "title": "Socks", "quantity": "3", "price": 4.5 },
                { "title": "Mystery", "quantity": "many", "price": "free" }
            ]
        }))
        .unwrap();

        let body = creator.build_body(&request);

        assert_eq!(body.items.len(), request.len());
        assert!(body.items.iter().all(|item| item.currency_id == "BRL"));
        assert_eq!(body.items[0].quantity, Some(Decimal::from(2)));
        assert_eq!(body.items[0].unit_price, Decimal::from_str("19.99").ok());
        assert_eq!(body.items[1].quantity, Some(Decimal::from(3)));
        assert_eq!(body.items[1].unit_price, Decimal::from_str("4.5").ok());
        assert_eq!(body.items[2].quantity, None);
        assert_eq!(body.items[2].unit_price, None);
        assert_eq!(body.auto_return, "approved");
    }

    #[tokio::test]
    async fn test_create_forwards_to_provider() {
        let (creator, provider) = creator(CheckoutConfig::default());

        let result = creator
            .create(&json!({ "items": [{ "title": "Shirt", "quantity": 2, "price": "19.99" }] }))
            .await
            .unwrap();

        assert_eq!(result.id, "pref-1");
        let bodies = provider.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0].back_urls.success,
            "http://localhost:3001/carrito?status=success"
        );
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_provider() {
        let (creator, provider) = creator(CheckoutConfig::default());

        for body in [json!({ "items": [] }), json!({})] {
            let err = creator.create(&body).await.unwrap_err();
            assert!(matches!(err, CheckoutError::InvalidCart { .. }));
        }
        assert!(provider.bodies.lock().unwrap().is_empty());
    }
}
