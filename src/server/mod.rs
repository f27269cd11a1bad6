//! HTTP transport for the checkout service
//!
//! This module wires the preference creator and the notification handler to
//! axum routes. All request handling decisions live in those units; the
//! handlers here only translate outcomes and errors into HTTP responses.
//!
//! # Routes
//!
//! - `GET /` - plain text greeting
//! - `POST /` - provider webhook notifications
//! - `POST /create_preference` - create a checkout preference
//! - `GET /health` - liveness and ledger sizes

use crate::checkout::{CheckoutConfig, PreferenceCreator};
use crate::config::{AppConfig, DEFAULT_BIND_ADDRESS};
use crate::ledger::{InMemoryLedger, PaymentLedger};
use crate::notifications::{DedupPolicy, NotificationHandler};
use crate::provider::{MercadoPagoClient, PaymentProvider};
use crate::{CheckoutError, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod handlers;


/// Configuration for HTTP server binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000")
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a new server config
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
        }
    }
}

/// Shared state handed to every route
#[derive(Debug, Clone)]
pub struct AppState {
    pub creator: PreferenceCreator,
    pub notifications: NotificationHandler,
}

impl AppState {
    /// Assemble state from explicit collaborators
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        ledger: Arc<dyn PaymentLedger>,
        checkout: CheckoutConfig,
        policy: DedupPolicy,
    ) -> Self {
        Self {
            creator: PreferenceCreator::new(provider.clone(), checkout),
            notifications: NotificationHandler::new(provider, ledger).with_policy(policy),
        }
    }

    /// Assemble state with the Mercado Pago client and an in-memory ledger
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = MercadoPagoClient::new(config.provider.clone())?;
        let ledger = InMemoryLedger::with_limits(config.ledger_limits);

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(ledger),
            config.checkout.clone(),
            config.dedup_policy,
        ))
    }
}

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::index_handler).post(handlers::notification_handler),
        )
        .route(
            "/create_preference",
            post(handlers::create_preference_handler),
        )
        .route("/health", get(handlers::health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Server builder
#[derive(Debug)]
pub struct ServerBuilder {
    router: Router,
    config: ServerConfig,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new(router: Router) -> Self {
        Self {
            router,
            config: ServerConfig::default(),
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    /// Use a full server config
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the server and run until Ctrl-C
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .map_err(|e| {
                CheckoutError::config(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        tracing::info!("Checkout server listening on http://{}", self.config.bind_addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CheckoutError::config(format!("Server error: {}", e)))?;

        tracing::info!("Checkout server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Convenience function to create a server builder
pub fn create_server(router: Router) -> ServerBuilder {
    ServerBuilder::new(router)
}
