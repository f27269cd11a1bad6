//! Webhook notification handling
//!
//! Every delivery is appended to the audit log, deduplicated by payment id,
//! and then verified against the provider before its status is acted on.
//!
//! # Flow
//!
//! 1. Record the raw payload
//! 2. Extract `data.id` → [`CheckoutError::MissingPaymentId`] when absent
//! 3. Duplicate id → [`NotificationOutcome::Duplicate`], no provider call
//! 4. Mark the id processed (when, depends on [`DedupPolicy`])
//! 5. Fetch the payment from the provider
//! 6. Branch on the fetched status

use crate::ledger::PaymentLedger;
use crate::provider::PaymentProvider;
use crate::types::{payment_id, PaymentDetails};
use crate::{CheckoutError, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// When a payment id is marked processed relative to verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Mark before calling the provider. At most one verification attempt per
    /// id; a failed verification is never re-driven by later deliveries.
    #[default]
    MarkBeforeVerify,
    /// Mark only after a successful verification. Failed verifications are
    /// retried by the next delivery of the same id, but concurrent deliveries
    /// may both reach the provider.
    MarkAfterVerify,
}

impl DedupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupPolicy::MarkBeforeVerify => "mark-before-verify",
            DedupPolicy::MarkAfterVerify => "mark-after-verify",
        }
    }
}

impl fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DedupPolicy {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mark-before-verify" | "before" => Ok(DedupPolicy::MarkBeforeVerify),
            "mark-after-verify" | "after" => Ok(DedupPolicy::MarkAfterVerify),
            other => Err(CheckoutError::config(format!(
                "Unknown dedup policy: {}",
                other
            ))),
        }
    }
}

/// Result of handling one notification
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    /// The id was already processed; the provider was not contacted
    Duplicate { payment_id: String },
    /// The provider reports the payment as approved
    Approved {
        payment_id: String,
        details: PaymentDetails,
    },
    /// The provider reports any other status
    NotApproved {
        payment_id: String,
        details: PaymentDetails,
    },
}

impl NotificationOutcome {
    pub fn payment_id(&self) -> &str {
        match self {
            NotificationOutcome::Duplicate { payment_id }
            | NotificationOutcome::Approved { payment_id, .. }
            | NotificationOutcome::NotApproved { payment_id, .. } => payment_id,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, NotificationOutcome::Duplicate { .. })
    }
}

/// Processes provider webhook deliveries
#[derive(Clone)]
pub struct NotificationHandler {
    provider: Arc<dyn PaymentProvider>,
    ledger: Arc<dyn PaymentLedger>,
    policy: DedupPolicy,
}

impl fmt::Debug for NotificationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHandler")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl NotificationHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, ledger: Arc<dyn PaymentLedger>) -> Self {
        Self {
            provider,
            ledger,
            policy: DedupPolicy::default(),
        }
    }

    /// Set the dedup policy
    pub fn with_policy(mut self, policy: DedupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    pub fn ledger(&self) -> &Arc<dyn PaymentLedger> {
        &self.ledger
    }

    /// Handle one raw notification payload
    pub async fn handle(&self, payload: Value) -> Result<NotificationOutcome> {
        let payment_id = payment_id(&payload);

        tracing::info!(payload = %payload, "Notification received");
        self.ledger.record(payload).await?;

        let Some(payment_id) = payment_id else {
            tracing::warn!("Notification did not include a payment id");
            return Err(CheckoutError::MissingPaymentId);
        };

        let first_delivery = match self.policy {
            DedupPolicy::MarkBeforeVerify => self.ledger.try_mark(&payment_id).await?,
            DedupPolicy::MarkAfterVerify => !self.ledger.is_processed(&payment_id).await?,
        };
        if !first_delivery {
            tracing::info!(%payment_id, "Payment already processed, ignoring duplicate");
            return Ok(NotificationOutcome::Duplicate { payment_id });
        }

        let details = self.provider.get_payment(&payment_id).await?;

        if self.policy == DedupPolicy::MarkAfterVerify {
            self.ledger.mark(&payment_id).await?;
        }

        if details.is_approved() {
            // Fulfilment hooks in here
            tracing::info!(%payment_id, details = ?details, "Payment approved");
            Ok(NotificationOutcome::Approved {
                payment_id,
                details,
            })
        } else {
            tracing::warn!(%payment_id, status = %details.status, "Payment not approved");
            Ok(NotificationOutcome::NotApproved {
                payment_id,
                details,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::types::{PaymentStatus, PreferenceBody, PreferenceResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Provider double answering payment lookups from a fixed table
    #[derive(Default)]
    struct ScriptedProvider {
        statuses: HashMap<String, PaymentStatus>,
        lookups: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn with(entries: &[(&str, PaymentStatus)]) -> Self {
            Self {
                statuses: entries
                    .iter()
                    .map(|(id, status)| (id.to_string(), *status))
                    .collect(),
                lookups: Mutex::default(),
            }
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentProvider for ScriptedProvider {
        async fn create_preference(&self, _body: &PreferenceBody) -> Result<PreferenceResult> {
            unreachable!("notification handling never creates preferences")
        }

        async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
            self.lookups.lock().unwrap().push(payment_id.to_string());
            match self.statuses.get(payment_id) {
                Some(status) => Ok(PaymentDetails {
                    status: *status,
                    ..PaymentDetails::default()
                }),
                None => Err(CheckoutError::provider_verification(404, "not found")),
            }
        }
    }

    fn handler(
        provider: &Arc<ScriptedProvider>,
        policy: DedupPolicy,
    ) -> (NotificationHandler, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let handler =
            NotificationHandler::new(provider.clone(), ledger.clone()).with_policy(policy);
        (handler, ledger)
    }

    fn notification(id: &str) -> Value {
        json!({ "type": "payment", "data": { "id": id } })
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "mark-before-verify".parse::<DedupPolicy>().unwrap(),
            DedupPolicy::MarkBeforeVerify
        );
        assert_eq!(
            "Mark-After-Verify".parse::<DedupPolicy>().unwrap(),
            DedupPolicy::MarkAfterVerify
        );
        assert!("sometimes".parse::<DedupPolicy>().is_err());
        assert_eq!(DedupPolicy::default().to_string(), "mark-before-verify");
    }

    #[tokio::test]
    async fn test_first_delivery_verifies_and_duplicate_short_circuits() {
        let provider = Arc::new(ScriptedProvider::with(&[("P1", PaymentStatus::Approved)]));
        let (handler, _) = handler(&provider, DedupPolicy::MarkBeforeVerify);

        let first = handler.handle(notification("P1")).await.unwrap();
        assert!(matches!(first, NotificationOutcome::Approved { .. }));

        let second = handler.handle(notification("P1")).await.unwrap();
        assert_eq!(
            second,
            NotificationOutcome::Duplicate {
                payment_id: "P1".to_string()
            }
        );

        assert_eq!(provider.lookups(), vec!["P1".to_string()]);
    }

    #[tokio::test]
    async fn test_non_approved_status_is_reported() {
        let provider = Arc::new(ScriptedProvider::with(&[("P2", PaymentStatus::Rejected)]));
        let (handler, ledger) = handler(&provider, DedupPolicy::MarkBeforeVerify);

        let outcome = handler.handle(notification("P2")).await.unwrap();
        match outcome {
            NotificationOutcome::NotApproved {
                payment_id,
                details,
            } => {
                assert_eq!(payment_id, "P2");
                assert_eq!(details.status, PaymentStatus::Rejected);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(ledger.is_processed("P2").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_id_is_rejected_but_audited() {
        let provider = Arc::new(ScriptedProvider::default());
        let (handler, ledger) = handler(&provider, DedupPolicy::MarkBeforeVerify);

        let payload = json!({ "action": "test.created" });
        let err = handler.handle(payload.clone()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::MissingPaymentId));
        let log = ledger.notifications().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].payload, payload);
        assert!(provider.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_failed_verification_stays_marked_by_default() {
        let provider = Arc::new(ScriptedProvider::default());
        let (handler, ledger) = handler(&provider, DedupPolicy::MarkBeforeVerify);

        let err = handler.handle(notification("P404")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ProviderVerification { status: 404, .. }));
        assert!(ledger.is_processed("P404").await.unwrap());

        let retry = handler.handle(notification("P404")).await.unwrap();
        assert!(retry.is_duplicate());
        assert_eq!(provider.lookups().len(), 1);
        assert_eq!(ledger.notifications().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_after_verify_redrives_failures() {
        let provider = Arc::new(ScriptedProvider::default());
        let (handler, ledger) = handler(&provider, DedupPolicy::MarkAfterVerify);

        assert!(handler.handle(notification("P404")).await.is_err());
        assert!(!ledger.is_processed("P404").await.unwrap());
        assert!(handler.handle(notification("P404")).await.is_err());

        assert_eq!(provider.lookups().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_after_verify_dedups_successes() {
        let provider = Arc::new(ScriptedProvider::with(&[("P5", PaymentStatus::Pending)]));
        let (handler, _) = handler(&provider, DedupPolicy::MarkAfterVerify);

        let first = handler.handle(notification("P5")).await.unwrap();
        assert!(!first.is_duplicate());
        let second = handler.handle(notification("P5")).await.unwrap();
        assert!(second.is_duplicate());

        assert_eq!(provider.lookups().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_deliveries_verify_once() {
        let provider = Arc::new(ScriptedProvider::with(&[("P6", PaymentStatus::Approved)]));
        let (handler, ledger) = handler(&provider, DedupPolicy::MarkBeforeVerify);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(notification("P6")).await.unwrap() })
            })
            .collect();

        let mut duplicates = 0;
        for handle in handles {
            if handle.await.unwrap().is_duplicate() {
                duplicates += 1;
            }
        }

        assert_eq!(duplicates, 15);
        assert_eq!(provider.lookups(), vec!["P6".to_string()]);
        assert_eq!(ledger.notification_count().await.unwrap(), 16);
    }

    #[tokio::test]
    async fn test_numeric_ids_share_dedup_with_strings() {
        let provider = Arc::new(ScriptedProvider::with(&[("42", PaymentStatus::Approved)]));
        let (handler, _) = handler(&provider, DedupPolicy::MarkBeforeVerify);

        let first = handler
            .handle(json!({ "data": { "id": 42 } }))
            .await
            .unwrap();
        assert_eq!(first.payment_id(), "42");

        let second = handler.handle(notification("42")).await.unwrap();
        assert!(second.is_duplicate());
    }
}
