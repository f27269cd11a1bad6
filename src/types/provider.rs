//! Provider client configuration

use super::constants::provider::DEFAULT_API_BASE_URL;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Configuration for the payment provider client
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API
    pub base_url: String,
    /// Private access token used as a bearer credential
    pub access_token: SecretString,
    /// Request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a config against the public API
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: SecretString::from(access_token.into()),
            timeout: None,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(crate::CheckoutError::config(
                "Provider access token cannot be empty",
            ));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            crate::CheckoutError::config(format!(
                "Invalid provider base URL {}: {}",
                self.base_url, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(crate::CheckoutError::config(
                "Provider base URL must start with http:// or https://",
            ));
        }

        Ok(())
    }

    /// Point the client at a different API host (sandbox or test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
