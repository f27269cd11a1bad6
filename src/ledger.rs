//! Storage trait for processed payment ids and the notification audit log
//!
//! This module provides a trait-based storage abstraction for deduplicating
//! webhook deliveries by payment id and for keeping every raw notification
//! for auditing.

use crate::types::NotificationRecord;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Trait for tracking processed payments and received notifications
///
/// This trait allows different storage backends to be used by the
/// notification handler.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Atomically mark a payment id as processed.
    ///
    /// Returns `false` when the id was already marked.
    async fn try_mark(&self, payment_id: &str) -> Result<bool>;

    /// Check if a payment id has been processed
    async fn is_processed(&self, payment_id: &str) -> Result<bool>;

    /// Mark a payment id as processed
    async fn mark(&self, payment_id: &str) -> Result<()>;

    /// Append a raw notification to the audit log
    async fn record(&self, payload: Value) -> Result<()>;

    /// Snapshot of the audit log in arrival order
    async fn notifications(&self) -> Result<Vec<NotificationRecord>>;

    /// Number of notifications currently kept in the audit log
    async fn notification_count(&self) -> Result<usize>;

    /// Number of payment ids currently marked
    async fn processed_count(&self) -> Result<usize>;
}

/// In-memory storage implementation
///
/// This is the default storage implementation. Data is lost when the server
/// restarts. Without limits both the processed set and the audit log grow for
/// the life of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    processed: Arc<RwLock<HashMap<String, Instant>>>,
    audit: Arc<RwLock<VecDeque<NotificationRecord>>>,
    limits: LedgerLimits,
}

/// Optional bounds for [`InMemoryLedger`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerLimits {
    /// Maximum audit entries kept; the oldest entry is dropped first
    pub audit_capacity: Option<usize>,
    /// How long a processed id suppresses duplicates
    pub processed_ttl: Option<Duration>,
}

impl InMemoryLedger {
    /// Create an unbounded in-memory ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with explicit bounds
    pub fn with_limits(limits: LedgerLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> LedgerLimits {
        self.limits
    }

    /// Drop expired ids; a no-op without a TTL
    fn prune(&self, processed: &mut HashMap<String, Instant>, now: Instant) {
        if self.limits.processed_ttl.is_some() {
            processed.retain(|_, marked_at| self.is_live(marked_at, now));
        }
    }

    fn is_live(&self, marked_at: &Instant, now: Instant) -> bool {
        match self.limits.processed_ttl {
            Some(ttl) => now.duration_since(*marked_at) < ttl,
            None => true,
        }
    }
}

#[async_trait]
impl PaymentLedger for InMemoryLedger {
    async fn try_mark(&self, payment_id: &str) -> Result<bool> {
        let now = Instant::now();
        let mut processed = self.processed.write().await;
        self.prune(&mut processed, now);
        if processed.contains_key(payment_id) {
            return Ok(false);
        }
        processed.insert(payment_id.to_string(), now);
        Ok(true)
    }

    async fn is_processed(&self, payment_id: &str) -> Result<bool> {
        let processed = self.processed.read().await;
        Ok(processed
            .get(payment_id)
            .is_some_and(|marked_at| self.is_live(marked_at, Instant::now())))
    }

    async fn mark(&self, payment_id: &str) -> Result<()> {
        let now = Instant::now();
        let mut processed = self.processed.write().await;
        self.prune(&mut processed, now);
        processed.insert(payment_id.to_string(), now);
        Ok(())
    }

    async fn record(&self, payload: Value) -> Result<()> {
        let mut audit = self.audit.write().await;
        if let Some(capacity) = self.limits.audit_capacity {
            if capacity == 0 {
                return Ok(());
            }
            while audit.len() >= capacity {
                audit.pop_front();
            }
        }
        audit.push_back(NotificationRecord::new(payload));
        Ok(())
    }

    async fn notifications(&self) -> Result<Vec<NotificationRecord>> {
        let audit = self.audit.read().await;
        Ok(audit.iter().cloned().collect())
    }

    async fn notification_count(&self) -> Result<usize> {
        Ok(self.audit.read().await.len())
    }

    async fn processed_count(&self) -> Result<usize> {
        let processed = self.processed.read().await;
        let now = Instant::now();
        Ok(processed
            .values()
            .filter(|marked_at| self.is_live(marked_at, now))
            .count())
    }
}
