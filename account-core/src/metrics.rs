//! Metrics collection for observability
//!
//! Prometheus metrics for account activity.
//!
//! # Metrics
//!
//! - `account_deposits_total` - Committed deposits
//! - `account_withdrawals_total` - Committed withdrawals
//! - `account_rejections_total{reason}` - Rejected operations by reason
//! - `account_history_length` - Records in the history

use crate::{types::TransactionKind, Error};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Committed deposits
    pub deposits_total: IntCounter,

    /// Committed withdrawals
    pub withdrawals_total: IntCounter,

    /// Rejections by reason
    pub rejections_total: IntCounterVec,

    /// Current history length
    pub history_length: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let deposits_total =
            IntCounter::new("account_deposits_total", "Total number of committed deposits")?;
        registry.register(Box::new(deposits_total.clone()))?;

        let withdrawals_total = IntCounter::new(
            "account_withdrawals_total",
            "Total number of committed withdrawals",
        )?;
        registry.register(Box::new(withdrawals_total.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new(
                "account_rejections_total",
                "Total number of rejected operations",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        let history_length = IntGauge::new(
            "account_history_length",
            "Number of records in the transaction history",
        )?;
        registry.register(Box::new(history_length.clone()))?;

        Ok(Self {
            deposits_total,
            withdrawals_total,
            rejections_total,
            history_length,
            registry,
        })
    }

    /// Record a committed transaction
    pub fn record_transaction(&self, kind: TransactionKind) {
        match kind {
            TransactionKind::Deposit => self.deposits_total.inc(),
            TransactionKind::Withdrawal => self.withdrawals_total.inc(),
        }
    }

    /// Record a rejected operation
    pub fn record_rejection(&self, error: &Error) {
        self.rejections_total
            .with_label_values(&[error.reason()])
            .inc();
    }

    /// Update history length
    pub fn set_history_length(&self, len: usize) {
        self.history_length.set(len as i64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("deposits_total", &self.deposits_total.get())
            .field("withdrawals_total", &self.withdrawals_total.get())
            .field("history_length", &self.history_length.get())
            .finish()
    }
}
