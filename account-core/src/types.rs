//! Core types for the account
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Cheap snapshots (records are plain data, cloned out of the lock)
//! - Serialization to JSON for inspection and export

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Label used for the funding deposit made when an account is opened
pub const INITIAL_DEPOSIT_LABEL: &str = "Initial Deposit";

/// Default label for deposits
pub const STANDARD_DEPOSIT_LABEL: &str = "Standard Deposit";

/// Default label for withdrawals
pub const STANDARD_WITHDRAWAL_LABEL: &str = "Standard Withdrawal";

/// Account identifier (account number, IBAN, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of balance movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum TransactionKind {
    /// Funds added to the account
    Deposit,
    /// Funds removed from the account
    Withdrawal,
}

impl TransactionKind {
    /// Upper-case name as shown in statements
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
        }
    }

    /// Apply this movement to a balance.
    ///
    /// Returns `None` on overflow or when a withdrawal would go below zero.
    pub fn apply(&self, balance: Decimal, amount: Decimal) -> Option<Decimal> {
        match self {
            TransactionKind::Deposit => balance.checked_add(amount),
            TransactionKind::Withdrawal => {
                let next = balance.checked_sub(amount)?;
                (next >= Decimal::ZERO).then_some(next)
            }
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed entry in an account's history.
///
/// Records are created only by the account itself and never change after
/// they are appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique transaction ID (UUIDv7 for time-ordering)
    pub transaction_id: Uuid,

    /// Position in the history, starting at 1
    pub sequence: u64,

    /// Deposit or withdrawal
    pub kind: TransactionKind,

    /// Amount moved (always positive)
    pub amount: Decimal,

    /// Balance immediately after this transaction
    pub resulting_balance: Decimal,

    /// Commit time
    pub timestamp: DateTime<Utc>,

    /// Free-text description
    pub label: String,
}

impl TransactionRecord {
    /// Signed effect of this record on the balance
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Withdrawal => -self.amount,
        }
    }

    /// Balance before this record was applied
    ///
    /// `None` when the record's figures fall outside the decimal range, which
    /// only a hand-built record can do.
    pub fn previous_balance(&self) -> Option<Decimal> {
        match self.kind {
            TransactionKind::Deposit => self.resulting_balance.checked_sub(self.amount),
            TransactionKind::Withdrawal => self.resulting_balance.checked_add(self.amount),
        }
    }
}
