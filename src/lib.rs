//! # mp-checkout
//!
//! A small checkout backend for Mercado Pago: it turns a storefront cart into a
//! checkout preference and processes the payment notifications the provider
//! posts back.
//!
//! ## Features
//!
//! - **Preference creation**: validates the cart and forwards it to the provider
//! - **Webhook handling**: deduplicates deliveries by payment id and re-fetches
//!   the payment from the provider before trusting its status
//! - **Audit log**: every raw notification is kept in memory
//! - **Configurable dedup policy**: mark ids before or after verification
//!
//! ## Quick Start
//!
//! ```no_run
//! use mp_checkout::config::AppConfig;
//! use mp_checkout::server::{create_router, create_server, AppState};
//!
//! # async fn example() -> mp_checkout::Result<()> {
//! let config = AppConfig::from_env()?;
//! let state = AppState::from_config(&config)?;
//!
//! create_server(create_router(state))
//!     .with_config(config.server.clone())
//!     .serve()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: Cart, preference, payment and notification types
//! - **`provider`**: Provider trait and the Mercado Pago REST client
//! - **`checkout`**: Preference creation
//! - **`notifications`**: Webhook processing and dedup policy
//! - **`ledger`**: Processed payment ids and the notification audit log
//! - **`server`**: axum routes and server bootstrap
//! - **`config`**: Environment-based configuration
//! - **`error`**: Error type shared by every module
//!
//! ## State
//!
//! Processed ids and the audit log live in process memory only. Restarting the
//! service forgets which payments were already handled.

pub mod checkout;
pub mod config;
pub mod error;
pub mod ledger;
pub mod notifications;
pub mod provider;
pub mod server;
pub mod types;

// Re-exports for convenience
pub use checkout::{CheckoutConfig, PreferenceCreator};
pub use error::{CheckoutError, Result};
pub use ledger::{InMemoryLedger, LedgerLimits, PaymentLedger};
pub use notifications::{DedupPolicy, NotificationHandler, NotificationOutcome};
pub use provider::{MercadoPagoClient, PaymentProvider};
pub use types::{
    CartItem, NotificationRecord, PaymentDetails, PaymentStatus, PreferenceBody, PreferenceItem,
    PreferenceRequest, PreferenceResult, ProviderConfig,
};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
