//! Shared account facade
//!
//! `Account` wraps an [`AccountState`] in a `parking_lot::RwLock` so one
//! account can be used from many threads at once. Deposits and withdrawals
//! take the write lock for the whole check-then-act, which makes the
//! history order the commit order.
//!
//! # Example
//!
//! ```
//! use account_core::Account;
//! use rust_decimal_macros::dec;
//!
//! let account = Account::open("S-1", dec!(1000.00));
//! account.deposit(dec!(250.50)).unwrap();
//! account.withdraw(dec!(125.00)).unwrap();
//!
//! assert_eq!(account.balance(), dec!(1125.50));
//! assert_eq!(account.history().len(), 3);
//! assert!(account.withdraw(dec!(5000.00)).is_err());
//! ```

use crate::{
    metrics::Metrics,
    state::AccountState,
    types::{
        AccountId, TransactionRecord, INITIAL_DEPOSIT_LABEL, STANDARD_DEPOSIT_LABEL,
        STANDARD_WITHDRAWAL_LABEL,
    },
    Result,
};
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;

/// A single account with balance and transaction history
#[derive(Debug)]
pub struct Account {
    /// Immutable identifier
    id: AccountId,

    /// Balance and history, always updated together
    state: RwLock<AccountState>,

    /// Activity counters (optional)
    metrics: Option<Metrics>,
}

impl Account {
    /// Open an account and fund it with `initial_amount`.
    ///
    /// A non-positive initial amount is rejected like any other deposit: the
    /// account still opens, with zero balance and an empty history.
    pub fn open(id: impl Into<AccountId>, initial_amount: Decimal) -> Self {
        let account = Self::empty(id.into());

        match account.deposit_with_label(initial_amount, INITIAL_DEPOSIT_LABEL) {
            Ok(_) => tracing::info!(
                account = %account.id,
                balance = %account.balance(),
                "Account opened"
            ),
            Err(e) => tracing::warn!(
                account = %account.id,
                error = %e,
                "Account opened without initial funding"
            ),
        }

        account
    }

    /// Open an account, failing if the initial deposit is rejected
    pub fn try_open(id: impl Into<AccountId>, initial_amount: Decimal) -> Result<Self> {
        let account = Self::empty(id.into());
        account.deposit_with_label(initial_amount, INITIAL_DEPOSIT_LABEL)?;
        tracing::info!(account = %account.id, balance = %account.balance(), "Account opened");
        Ok(account)
    }

    fn empty(id: AccountId) -> Self {
        Self {
            id,
            state: RwLock::new(AccountState::new()),
            metrics: None,
        }
    }

    /// Attach metrics collector
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        metrics.set_history_length(self.state.get_mut().len());
        self.metrics = Some(metrics);
        self
    }

    /// Account identifier
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Deposit with the standard label
    pub fn deposit(&self, amount: Decimal) -> Result<TransactionRecord> {
        self.deposit_with_label(amount, STANDARD_DEPOSIT_LABEL)
    }

    /// Deposit with a custom history label
    pub fn deposit_with_label(
        &self,
        amount: Decimal,
        label: impl Into<String>,
    ) -> Result<TransactionRecord> {
        let result = {
            let mut state = self.state.write();
            let committed = state.apply_deposit(amount, label, Utc::now()).cloned();
            if committed.is_ok() {
                self.track_history_length(&state);
            }
            committed
        };
        self.observe(result)
    }

    /// Withdraw with the standard label
    pub fn withdraw(&self, amount: Decimal) -> Result<TransactionRecord> {
        self.withdraw_with_label(amount, STANDARD_WITHDRAWAL_LABEL)
    }

    /// Withdraw with a custom history label
    pub fn withdraw_with_label(
        &self,
        amount: Decimal,
        label: impl Into<String>,
    ) -> Result<TransactionRecord> {
        let result = {
            let mut state = self.state.write();
            let committed = state.apply_withdrawal(amount, label, Utc::now()).cloned();
            if committed.is_ok() {
                self.track_history_length(&state);
            }
            committed
        };
        self.observe(result)
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.state.read().balance()
    }

    /// Snapshot of the history in commit order
    pub fn history(&self) -> Vec<TransactionRecord> {
        self.state.read().history().to_vec()
    }

    /// Number of committed transactions
    pub fn transaction_count(&self) -> usize {
        self.state.read().len()
    }

    /// Most recent transaction
    pub fn last_transaction(&self) -> Option<TransactionRecord> {
        self.state.read().last().cloned()
    }

    /// Copy of the full state, taken under one read lock
    pub fn snapshot(&self) -> AccountState {
        self.state.read().clone()
    }

    /// Re-check balance/history consistency
    pub fn verify(&self) -> Result<()> {
        self.state.read().verify()
    }

    /// Publish the history length; callers hold the write lock
    fn track_history_length(&self, state: &AccountState) {
        if let Some(metrics) = &self.metrics {
            metrics.set_history_length(state.len());
        }
    }

    /// Log and count the outcome of a mutation (outside the lock)
    fn observe(&self, result: Result<TransactionRecord>) -> Result<TransactionRecord> {
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
                }
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(account = %self.id, error = %e, "Transaction rejected");
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejection(&e);
                }
                Err(e)
            }
        }
    }
}
