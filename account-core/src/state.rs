//! Account state and its transition function
//!
//! `AccountState` is the single place where balance and history change.
//! Both the lock-guarded [`Account`](crate::Account) and the actor in
//! [`actor`](crate::actor) drive it, so the two front ends share one
//! definition of what a deposit or withdrawal does.
//!
//! Every transition either commits fully (balance updated and exactly one
//! record appended) or returns an error with nothing touched.

use crate::{
    types::{TransactionKind, TransactionRecord},
    Error, Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Balance plus append-only history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    balance: Decimal,
    history: Vec<TransactionRecord>,
}

impl AccountState {
    /// Empty state: zero balance, no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Full history in commit order
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Most recent record
    pub fn last(&self) -> Option<&TransactionRecord> {
        self.history.last()
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True until the first successful transaction
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Add funds.
    ///
    /// Fails with `InvalidAmount` when `amount <= 0` (or when the sum would
    /// overflow the decimal range).
    pub fn apply_deposit(
        &mut self,
        amount: Decimal,
        label: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&TransactionRecord> {
        ensure_positive(amount)?;

        let next = TransactionKind::Deposit
            .apply(self.balance, amount)
            .ok_or(Error::InvalidAmount { amount })?;

        Ok(self.commit(TransactionKind::Deposit, amount, next, label.into(), now))
    }

    /// Remove funds.
    ///
    /// Checks run in order: `amount > 0`, then `balance >= amount`.
    pub fn apply_withdrawal(
        &mut self,
        amount: Decimal,
        label: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&TransactionRecord> {
        ensure_positive(amount)?;

        let next = TransactionKind::Withdrawal
            .apply(self.balance, amount)
            .ok_or(Error::InsufficientFunds {
                requested: amount,
                available: self.balance,
            })?;

        Ok(self.commit(TransactionKind::Withdrawal, amount, next, label.into(), now))
    }

    fn commit(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        resulting_balance: Decimal,
        label: String,
        now: DateTime<Utc>,
    ) -> &TransactionRecord {
        // Wall clock may step backwards; history timestamps may not.
        let timestamp = match self.history.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        self.balance = resulting_balance;
        self.history.push(TransactionRecord {
            transaction_id: Uuid::now_v7(),
            sequence: self.history.len() as u64 + 1,
            kind,
            amount,
            resulting_balance,
            timestamp,
            label,
        });

        &self.history[self.history.len() - 1]
    }

    /// Re-check every invariant over the stored history.
    ///
    /// The balance must equal the last record's `resulting_balance` (or zero
    /// with no history), and each record must follow from its predecessor.
    pub fn verify(&self) -> Result<()> {
        let mut balance = Decimal::ZERO;
        let mut previous: Option<&TransactionRecord> = None;

        for record in &self.history {
            balance = check_step(balance, previous, record)?;
            previous = Some(record);
        }

        if balance != self.balance {
            return Err(Error::InvariantViolation(format!(
                "balance {} does not match history total {}",
                self.balance, balance
            )));
        }

        Ok(())
    }

    /// Rebuild state from a record sequence, validating each step
    pub fn replay(records: impl IntoIterator<Item = TransactionRecord>) -> Result<Self> {
        let mut state = Self::new();

        for record in records {
            state.balance = check_step(state.balance, state.history.last(), &record)?;
            state.history.push(record);
        }

        Ok(state)
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Validate one record against the running balance; returns the new balance
fn check_step(
    balance: Decimal,
    previous: Option<&TransactionRecord>,
    record: &TransactionRecord,
) -> Result<Decimal> {
    let expected_sequence = previous.map_or(1, |p| p.sequence + 1);
    if record.sequence != expected_sequence {
        return Err(Error::InvariantViolation(format!(
            "record {} has sequence {}, expected {}",
            record.transaction_id, record.sequence, expected_sequence
        )));
    }

    if record.amount <= Decimal::ZERO {
        return Err(Error::InvariantViolation(format!(
            "record {} has non-positive amount {}",
            record.sequence, record.amount
        )));
    }

    if let Some(prev) = previous {
        if record.timestamp < prev.timestamp {
            return Err(Error::InvariantViolation(format!(
                "record {} is older than record {}",
                record.sequence, prev.sequence
            )));
        }
    }

    match record.kind.apply(balance, record.amount) {
        Some(next) if next == record.resulting_balance => Ok(next),
        Some(next) => Err(Error::InvariantViolation(format!(
            "record {} claims balance {}, expected {}",
            record.sequence, record.resulting_balance, next
        ))),
        None => Err(Error::InvariantViolation(format!(
            "record {} would take balance {} below zero",
            record.sequence, balance
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deposit_appends_one_record() {
        let mut state = AccountState::new();
        let record = state
            .apply_deposit(dec!(1000.00), "Initial Deposit", Utc::now())
            .unwrap();

        assert_eq!(record.sequence, 1);
        assert_eq!(record.kind, TransactionKind::Deposit);
        assert_eq!(record.resulting_balance, dec!(1000.00));
        assert_eq!(state.balance(), dec!(1000.00));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_rejected_deposit_leaves_state_untouched() {
        let mut state = AccountState::new();
        state.apply_deposit(dec!(50), "seed", Utc::now()).unwrap();
        let before = state.clone();

        for amount in [dec!(0), dec!(-10.00)] {
            let err = state.apply_deposit(amount, "bad", Utc::now()).unwrap_err();
            assert!(matches!(err, Error::InvalidAmount { .. }));
        }

        assert_eq!(state, before);
    }

    #[test]
    fn test_withdrawal_checks_amount_before_balance() {
        let mut state = AccountState::new();

        // Empty account: a negative amount is still reported as invalid
        let err = state
            .apply_withdrawal(dec!(-5), "bad", Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));

        let err = state
            .apply_withdrawal(dec!(5), "too much", Utc::now())
            .unwrap_err();
        match err {
            Error::InsufficientFunds {
                requested,
                available,
            } => {
                assert_eq!(requested, dec!(5));
                assert_eq!(available, Decimal::ZERO);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(state.is_empty());
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut state = AccountState::new();
        state.apply_deposit(dec!(10.10), "seed", Utc::now()).unwrap();
        state
            .apply_withdrawal(dec!(10.10), "all", Utc::now())
            .unwrap();

        assert_eq!(state.balance(), Decimal::ZERO);
        assert_eq!(state.len(), 2);
        state.verify().unwrap();
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut state = AccountState::new();
        let now = Utc::now();
        state.apply_deposit(dec!(1), "a", now).unwrap();
        state
            .apply_deposit(dec!(1), "b", now - Duration::seconds(30))
            .unwrap();

        let history = state.history();
        assert_eq!(history[1].timestamp, history[0].timestamp);
        state.verify().unwrap();
    }

    #[test]
    fn test_replay_reproduces_state() {
        let mut state = AccountState::new();
        state.apply_deposit(dec!(1000.00), "a", Utc::now()).unwrap();
        state.apply_deposit(dec!(250.50), "b", Utc::now()).unwrap();
        state.apply_withdrawal(dec!(125.00), "c", Utc::now()).unwrap();

        let rebuilt = AccountState::replay(state.history().to_vec()).unwrap();
        assert_eq!(rebuilt, state);
        assert_eq!(rebuilt.balance(), dec!(1125.50));
    }

    #[test]
    fn test_replay_rejects_tampered_history() {
        let mut state = AccountState::new();
        state.apply_deposit(dec!(100), "a", Utc::now()).unwrap();
        state.apply_withdrawal(dec!(40), "b", Utc::now()).unwrap();

        let mut records = state.history().to_vec();
        records[1].resulting_balance = dec!(70);
        let err = AccountState::replay(records).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));

        let mut records = state.history().to_vec();
        records.swap(0, 1);
        assert!(AccountState::replay(records).is_err());
    }
}
