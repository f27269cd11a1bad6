//! Route handlers

use super::AppState;
use crate::ledger::PaymentLedger;
use crate::notifications::NotificationOutcome;
use crate::types::checkout::EMPTY_CART_MESSAGE;
use crate::CheckoutError;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

pub const GREETING: &str = "Checkout server is running";
pub const PREFERENCE_ERROR_MESSAGE: &str = "There was an error creating the preference";
pub const PROCESSED_MESSAGE: &str = "OK";
pub const DUPLICATE_MESSAGE: &str = "Duplicate notification ignored.";
pub const MISSING_ID_MESSAGE: &str = "Payment id not provided.";
pub const VERIFICATION_ERROR_MESSAGE: &str = "Error verifying payment.";
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing notification.";

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Parse a request body as JSON.
///
/// Bodies that are empty or not sent as `application/json` become `{}`;
/// malformed JSON becomes `null`.
fn parse_body(headers: &HeaderMap, body: &Bytes) -> Value {
    if body.is_empty() || !is_json(headers) {
        return json!({});
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!("Request body is not valid JSON: {}", e);
        Value::Null
    })
}

pub async fn index_handler() -> &'static str {
    GREETING
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let ledger = state.notifications.ledger();
    let processed = ledger.processed_count().await.ok();
    let notifications = ledger.notification_count().await.ok();

    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "dedup_policy": state.notifications.policy().as_str(),
        "processed": processed,
        "notifications": notifications,
    }))
}

/// Handle checkout preference creation
pub async fn create_preference_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = parse_body(&headers, &body);

    match state.creator.create(&body).await {
        Ok(preference) => Json(json!({ "id": preference.id })).into_response(),
        Err(CheckoutError::InvalidCart { message }) => {
            tracing::warn!("Rejected preference request: {}", message);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": EMPTY_CART_MESSAGE })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error creating preference: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": PREFERENCE_ERROR_MESSAGE })),
            )
                .into_response()
        }
    }
}

/// Handle provider webhook notifications
pub async fn notification_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let payload = parse_body(&headers, &body);

    match state.notifications.handle(payload).await {
        Ok(NotificationOutcome::Duplicate { .. }) => (StatusCode::OK, DUPLICATE_MESSAGE),
        Ok(_) => (StatusCode::OK, PROCESSED_MESSAGE),
        Err(CheckoutError::MissingPaymentId) => (StatusCode::BAD_REQUEST, MISSING_ID_MESSAGE),
        Err(e @ CheckoutError::ProviderVerification { .. }) => {
            tracing::error!("Error verifying payment: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, VERIFICATION_ERROR_MESSAGE)
        }
        Err(e) => {
            tracing::error!("Error processing notification: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_ERROR_MESSAGE)
        }
    }
}
