//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MP_ACCESS_TOKEN` - Mercado Pago private access token
//!
//! ## Optional
//! - `BIND_ADDRESS` - Server bind address (default: 0.0.0.0:3000)
//! - `MP_API_BASE_URL` - Provider API base URL (default: https://api.mercadopago.com)
//! - `MP_TIMEOUT_SECS` - Provider request timeout in seconds (default: none)
//! - `CHECKOUT_CURRENCY` - Currency for every line item (default: ARS)
//! - `FRONTEND_URL` - Frontend receiving checkout redirects (default: http://localhost:3001)
//! - `DEDUP_POLICY` - `mark-before-verify` or `mark-after-verify` (default: mark-before-verify)
//! - `AUDIT_LOG_CAPACITY` - Maximum notifications kept in memory (default: unbounded)
//! - `PROCESSED_TTL_SECS` - Seconds a processed payment id suppresses duplicates (default: forever)

use crate::checkout::CheckoutConfig;
use crate::ledger::LedgerLimits;
use crate::notifications::DedupPolicy;
use crate::server::ServerConfig;
use crate::types::checkout::{DEFAULT_CURRENCY, DEFAULT_FRONTEND_URL};
use crate::types::provider_api::DEFAULT_API_BASE_URL;
use crate::types::ProviderConfig;
use crate::{CheckoutError, Result};
use std::str::FromStr;
use std::time::Duration;

/// Default bind address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub checkout: CheckoutConfig,
    pub dedup_policy: DedupPolicy,
    pub ledger_limits: LedgerLimits,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let access_token = get("MP_ACCESS_TOKEN").ok_or_else(|| {
            CheckoutError::config("Missing environment variable: MP_ACCESS_TOKEN")
        })?;

        let mut provider = ProviderConfig::new(access_token).with_base_url(
            get("MP_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        );
        if let Some(secs) = parse_optional::<u64>(get("MP_TIMEOUT_SECS"), "MP_TIMEOUT_SECS")? {
            provider = provider.with_timeout(Duration::from_secs(secs));
        }
        provider.validate()?;

        let checkout = CheckoutConfig::default()
            .with_currency(get("CHECKOUT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
            .with_frontend_url(
                get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            );
        checkout.validate()?;

        let dedup_policy = match get("DEDUP_POLICY") {
            Some(policy) => DedupPolicy::from_str(&policy)?,
            None => DedupPolicy::default(),
        };

        let ledger_limits = LedgerLimits {
            audit_capacity: parse_optional(get("AUDIT_LOG_CAPACITY"), "AUDIT_LOG_CAPACITY")?,
            processed_ttl: parse_optional::<u64>(
                get("PROCESSED_TTL_SECS"),
                "PROCESSED_TTL_SECS",
            )?
            .map(Duration::from_secs),
        };

        let server = ServerConfig::new(
            get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
        );

        Ok(Self {
            server,
            provider,
            checkout,
            dedup_policy,
            ledger_limits,
        })
    }
}

fn parse_optional<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                CheckoutError::config(format!("Invalid environment variable {}: {}", key, e))
            })
        })
        .transpose()
}
