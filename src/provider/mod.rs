//! Payment provider client for preference creation and payment lookup
//!
//! This module provides the outbound side of the service. The
//! [`PaymentProvider`] trait is the seam the checkout and notification units
//! depend on; [`MercadoPagoClient`] implements it against the Mercado Pago
//! REST API.
//!
//! # Examples
//!
//! ```no_run
//! use mp_checkout::provider::{MercadoPagoClient, PaymentProvider};
//! use mp_checkout::types::ProviderConfig;
//!
//! # async fn example() -> mp_checkout::Result<()> {
//! let config = ProviderConfig::new("APP_USR-...");
//! let client = MercadoPagoClient::new(config)?;
//!
//! let payment = client.get_payment("1234567890").await?;
//! if payment.is_approved() {
//!     println!("Payment approved");
//! }
//! # Ok(())
//! # }
//! ```

use crate::types::provider_api::{IDEMPOTENCY_HEADER, PAYMENTS_PATH, PREFERENCES_PATH};
use crate::types::{PaymentDetails, PreferenceBody, PreferenceResult, ProviderConfig};
use crate::{CheckoutError, Result};
use async_trait::async_trait;
use http::header::AUTHORIZATION;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};


/// Operations this service needs from the payment provider
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a checkout preference and return its session identifier
    async fn create_preference(&self, body: &PreferenceBody) -> Result<PreferenceResult>;

    /// Fetch the authoritative state of a payment.
    ///
    /// A non-success response is reported as
    /// [`CheckoutError::ProviderVerification`].
    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails>;
}

/// Mercado Pago REST client
#[derive(Clone)]
pub struct MercadoPagoClient {
    /// Base URL of the provider API
    base_url: String,
    /// Bearer credential
    access_token: SecretString,
    /// HTTP client
    client: Client,
}

impl std::fmt::Debug for MercadoPagoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoPagoClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl MercadoPagoClient {
    /// Create a new provider client
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| CheckoutError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
            client,
        })
    }

    /// Get the base URL of the provider API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

#[async_trait]
impl PaymentProvider for MercadoPagoClient {
    async fn create_preference(&self, body: &PreferenceBody) -> Result<PreferenceResult> {
        tracing::debug!(
            "Preference request body: {}",
            serde_json::to_string_pretty(body).unwrap_or_default()
        );

        let response = self
            .client
            .post(format!("{}{}", self.base_url, PREFERENCES_PATH))
            .header(AUTHORIZATION, self.bearer())
            .header(IDEMPOTENCY_HEADER, uuid::Uuid::new_v4().to_string())
            .json(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let response_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            tracing::error!(
                "Preference creation failed with status: {}. Response body: {}",
                status,
                response_body
            );
            return Err(CheckoutError::provider(format!(
                "Preference creation failed with status: {}. Response: {}",
                status, response_body
            )));
        }

        let preference: PreferenceResult = response.json().await?;
        tracing::debug!("Preference created: {}", preference.id);
        Ok(preference)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        let mut url = url::Url::parse(&format!("{}{}/", self.base_url, PAYMENTS_PATH))
            .map_err(|e| CheckoutError::config(format!("Invalid payments URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CheckoutError::config("Provider base URL cannot be a base"))?
            .pop_if_empty()
            .push(payment_id);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let response_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(CheckoutError::provider_verification(
                status.as_u16(),
                response_body,
            ));
        }

        let details: PaymentDetails = response.json().await?;
        Ok(details)
    }
}
