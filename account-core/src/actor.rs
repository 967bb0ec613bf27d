//! Actor-based concurrency for an account
//!
//! Single-writer alternative to the lock-guarded [`Account`](crate::Account):
//! - One task owns the `AccountState`, so operations never contend on a lock
//! - Commit order is mailbox order
//! - Bounded mailbox gives backpressure to callers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              AccountHandle (Clone)                    │
//! │         Sends messages to actor mailbox              │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              AccountActor (Single Task)               │
//! │        AccountState::apply_deposit / withdrawal       │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ oneshot reply
//!                       ▼
//!                    caller
//! ```

use crate::{
    metrics::Metrics,
    state::AccountState,
    types::{
        AccountId, TransactionRecord, INITIAL_DEPOSIT_LABEL, STANDARD_DEPOSIT_LABEL,
        STANDARD_WITHDRAWAL_LABEL,
    },
    Error, Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the account actor
#[derive(Debug)]
pub enum AccountMessage {
    /// Add funds
    Deposit {
        /// Amount to move
        amount: Decimal,
        /// History label
        label: String,
        /// Committed record or rejection
        response: oneshot::Sender<Result<TransactionRecord>>,
    },

    /// Remove funds
    Withdraw {
        /// Amount to move
        amount: Decimal,
        /// History label
        label: String,
        /// Committed record or rejection
        response: oneshot::Sender<Result<TransactionRecord>>,
    },

    /// Read balance
    GetBalance {
        /// Reply channel
        response: oneshot::Sender<Decimal>,
    },

    /// Read history snapshot
    GetHistory {
        /// Reply channel
        response: oneshot::Sender<Vec<TransactionRecord>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns one account's state
#[derive(Debug)]
pub struct AccountActor {
    /// Account identifier (for logs)
    id: AccountId,

    /// Balance and history
    state: AccountState,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<AccountMessage>,

    /// Activity counters (optional)
    metrics: Option<Metrics>,
}

impl AccountActor {
    /// Create new actor
    pub fn new(id: AccountId, state: AccountState, mailbox: mpsc::Receiver<AccountMessage>) -> Self {
        Self {
            id,
            state,
            mailbox,
            metrics: None,
        }
    }

    /// Attach metrics collector
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        metrics.set_history_length(self.state.len());
        self.metrics = Some(metrics);
        self
    }

    /// Run the actor event loop until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                AccountMessage::Shutdown => break,
                msg => self.handle_message(msg),
            }
        }

        tracing::debug!(
            account = %self.id,
            transactions = self.state.len(),
            "Account actor stopped"
        );
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: AccountMessage) {
        match msg {
            AccountMessage::Deposit {
                amount,
                label,
                response,
            } => {
                let result = self
                    .state
                    .apply_deposit(amount, label, Utc::now())
                    .cloned();
                self.log_outcome(&result);
                let _ = response.send(result);
            }

            AccountMessage::Withdraw {
                amount,
                label,
                response,
            } => {
                let result = self
                    .state
                    .apply_withdrawal(amount, label, Utc::now())
                    .cloned();
                self.log_outcome(&result);
                let _ = response.send(result);
            }

            AccountMessage::GetBalance { response } => {
                let _ = response.send(self.state.balance());
            }

            AccountMessage::GetHistory { response } => {
                let _ = response.send(self.state.history().to_vec());
            }

            AccountMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }

    fn log_outcome(&self, result: &Result<TransactionRecord>) {
        match result {
            Ok(record) => {
                tracing::debug!(
                    account = %self.id,
                    sequence = record.sequence,
                    kind = %record.kind,
                    amount = %record.amount,
                    balance = %record.resulting_balance,
                    "Transaction committed"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_transaction(record.kind);
                    metrics.set_history_length(self.state.len());
                }
            }
            Err(e) => {
                tracing::warn!(account = %self.id, error = %e, "Transaction rejected");
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejection(e);
                }
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Debug, Clone)]
pub struct AccountHandle {
    id: AccountId,
    sender: mpsc::Sender<AccountMessage>,
}

impl AccountHandle {
    /// Create new handle
    pub fn new(id: AccountId, sender: mpsc::Sender<AccountMessage>) -> Self {
        Self { id, sender }
    }

    /// Account identifier
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Deposit with the standard label
    pub async fn deposit(&self, amount: Decimal) -> Result<TransactionRecord> {
        self.deposit_with_label(amount, STANDARD_DEPOSIT_LABEL).await
    }

    /// Deposit with a custom history label
    pub async fn deposit_with_label(
        &self,
        amount: Decimal,
        label: impl Into<String>,
    ) -> Result<TransactionRecord> {
        let (tx, rx) = oneshot::channel();
        self.send(AccountMessage::Deposit {
            amount,
            label: label.into(),
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Withdraw with the standard label
    pub async fn withdraw(&self, amount: Decimal) -> Result<TransactionRecord> {
        self.withdraw_with_label(amount, STANDARD_WITHDRAWAL_LABEL).await
    }

    /// Withdraw with a custom history label
    pub async fn withdraw_with_label(
        &self,
        amount: Decimal,
        label: impl Into<String>,
    ) -> Result<TransactionRecord> {
        let (tx, rx) = oneshot::channel();
        self.send(AccountMessage::Withdraw {
            amount,
            label: label.into(),
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Current balance
    pub async fn balance(&self) -> Result<Decimal> {
        let (tx, rx) = oneshot::channel();
        self.send(AccountMessage::GetBalance { response: tx }).await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Snapshot of the history in commit order
    pub async fn history(&self) -> Result<Vec<TransactionRecord>> {
        let (tx, rx) = oneshot::channel();
        self.send(AccountMessage::GetHistory { response: tx }).await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.send(AccountMessage::Shutdown).await
    }

    async fn send(&self, msg: AccountMessage) -> Result<()> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))
    }
}

/// Open an account owned by a new actor task.
///
/// The initial deposit follows the same rule as
/// [`Account::open`](crate::Account::open): a non-positive amount leaves the
/// account empty but still running.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_account_actor(
    id: impl Into<AccountId>,
    initial_amount: Decimal,
    mailbox_capacity: usize,
) -> AccountHandle {
    spawn_account_actor_with_metrics(id, initial_amount, mailbox_capacity, None)
}

/// Like [`spawn_account_actor`], counting activity into `metrics` when given.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_account_actor_with_metrics(
    id: impl Into<AccountId>,
    initial_amount: Decimal,
    mailbox_capacity: usize,
    metrics: Option<Metrics>,
) -> AccountHandle {
    let id = id.into();
    let mut state = AccountState::new();

    if let Err(e) = state.apply_deposit(initial_amount, INITIAL_DEPOSIT_LABEL, Utc::now()) {
        tracing::warn!(account = %id, error = %e, "Account opened without initial funding");
    }

    let (tx, rx) = mpsc::channel(mailbox_capacity.max(1)); // Bounded channel for backpressure
    let mut actor = AccountActor::new(id.clone(), state, rx);
    if let Some(metrics) = metrics {
        actor = actor.with_metrics(metrics);
    }

    tokio::spawn(async move {
        actor.run().await;
    });

    AccountHandle::new(id, tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let handle = spawn_account_actor("S-1", dec!(10), 16);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_deposit_and_withdraw() {
        let handle = spawn_account_actor("S-1", dec!(1000.00), 16);

        handle.deposit(dec!(250.50)).await.unwrap();
        let record = handle.withdraw(dec!(125.00)).await.unwrap();
        assert_eq!(record.kind, TransactionKind::Withdrawal);
        assert_eq!(record.sequence, 3);

        assert_eq!(handle.balance().await.unwrap(), dec!(1125.50));

        let err = handle.withdraw(dec!(5000.00)).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds { .. }));
        assert_eq!(handle.history().await.unwrap().len(), 3);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_invalid_initial_deposit() {
        let handle = spawn_account_actor("S-2", Decimal::ZERO, 16);

        assert_eq!(handle.balance().await.unwrap(), Decimal::ZERO);
        assert!(handle.history().await.unwrap().is_empty());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_metrics_follow_activity() {
        let metrics = Metrics::new().unwrap();
        let handle =
            spawn_account_actor_with_metrics("S-5", dec!(100), 16, Some(metrics.clone()));

        handle.deposit(dec!(1)).await.unwrap();
        handle.withdraw(dec!(2)).await.unwrap();
        handle.withdraw(dec!(500)).await.unwrap_err();
        handle.deposit(dec!(0)).await.unwrap_err();

        // Replies are sent after the counters are updated
        assert_eq!(metrics.deposits_total.get(), 1);
        assert_eq!(metrics.withdrawals_total.get(), 1);
        assert_eq!(
            metrics
                .rejections_total
                .with_label_values(&["insufficient_funds"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .rejections_total
                .with_label_values(&["invalid_amount"])
                .get(),
            1
        );
        assert_eq!(metrics.history_length.get(), 3);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_after_shutdown() {
        let handle = spawn_account_actor("S-3", dec!(1), 16);
        handle.shutdown().await.unwrap();

        // Give the actor a chance to exit and drop its receiver
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let err = handle.deposit(dec!(1)).await.unwrap_err();
        assert!(matches!(err, Error::Concurrency(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_handles_serialize() {
        let handle = spawn_account_actor("S-4", dec!(10.00), 8);

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.withdraw(dec!(1.00)).await.is_ok() })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 10);
        assert_eq!(handle.balance().await.unwrap(), Decimal::ZERO);

        let history = handle.history().await.unwrap();
        assert_eq!(history.len(), 11);
        AccountState::replay(history).unwrap();

        handle.shutdown().await.unwrap();
    }
}
