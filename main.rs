//! Checkout Server
//!
//! Creates Mercado Pago checkout preferences and processes payment webhooks.
//!
//! ## Endpoints
//!
//! - `GET /` - Greeting
//! - `POST /create_preference` - Create a checkout preference from a cart
//! - `POST /` - Payment notification webhook
//! - `GET /health` - Health check
//!
//! See [`mp_checkout::config`] for the environment variables.

use mp_checkout::config::AppConfig;
use mp_checkout::server::{create_router, create_server, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        provider = %config.provider.base_url,
        currency = %config.checkout.currency_id,
        dedup_policy = %config.dedup_policy,
        "Starting checkout server"
    );

    let state = AppState::from_config(&config)?;

    create_server(create_router(state))
        .with_config(config.server.clone())
        .serve()
        .await?;

    Ok(())
}
