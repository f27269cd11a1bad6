//! Error types for the checkout service

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Errors raised while creating preferences or handling payment notifications
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart payload had no usable `items` sequence
    #[error("Invalid cart: {message}")]
    InvalidCart { message: String },

    /// A webhook payload arrived without `data.id`
    #[error("Payment id not provided in notification")]
    MissingPaymentId,

    /// The provider answered the payment lookup with a non-success status
    #[error("Payment verification failed with status: {status}. Response: {body}")]
    ProviderVerification { status: u16, body: String },

    /// The provider rejected a request other than the payment lookup
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckoutError {
    pub fn invalid_cart(message: impl Into<String>) -> Self {
        Self::InvalidCart {
            message: message.into(),
        }
    }

    pub fn provider_verification(status: u16, body: impl Into<String>) -> Self {
        Self::ProviderVerification {
            status,
            body: body.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error was caused by the caller's input rather than by
    /// this service or the provider
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCart { .. } | Self::MissingPaymentId)
    }
}
