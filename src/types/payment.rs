//! Payment details returned by the provider's payment lookup

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Approved,
    Pending,
    Authorized,
    InProcess,
    InMediation,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    /// Any status this crate does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Approved => "approved",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::InProcess => "in_process",
            PaymentStatus::InMediation => "in_mediation",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::ChargedBack => "charged_back",
            PaymentStatus::Unknown => "unknown",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentStatus::Approved)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative payment state fetched from the provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Provider payment id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Current payment status
    #[serde(default)]
    pub status: PaymentStatus,
    /// Provider's explanation of the status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    /// Charged amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_amount: Option<Decimal>,
    /// ISO currency code of the charge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    /// Merchant reference attached to the preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
}

impl PaymentDetails {
    pub fn is_approved(&self) -> bool {
        self.status.is_approved()
    }
}
