//! Webhook notification payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw notification as kept in the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// When this service received the notification
    pub received_at: DateTime<Utc>,
    /// Payload exactly as delivered
    pub payload: Value,
}

impl NotificationRecord {
    pub fn new(payload: Value) -> Self {
        Self {
            received_at: Utc::now(),
            payload,
        }
    }

    pub fn payment_id(&self) -> Option<String> {
        payment_id(&self.payload)
    }
}

/// Extract the payment id from `data.id`.
///
/// Non-empty strings are used as-is and non-zero numbers are rendered in
/// decimal. Empty strings, zero, and every other JSON type count as absent.
pub fn payment_id(payload: &Value) -> Option<String> {
    match payload.get("data")?.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
        _ => None,
    }
}
