//! Error types for account operations

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for account operations
pub type Result<T> = std::result::Result<T, Error>;

/// Account errors
#[derive(Error, Debug)]
pub enum Error {
    /// Amount was zero or negative
    #[error("Invalid amount: {amount} (must be positive)")]
    InvalidAmount {
        /// Rejected amount
        amount: Decimal,
    },

    /// Withdrawal larger than the current balance
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested withdrawal amount
        requested: Decimal,
        /// Balance at the time of the request
        available: Decimal,
    },

    /// History does not reproduce the balance
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a recoverable domain rejection.
    ///
    /// Rejections leave the account untouched and are expected during
    /// normal use; everything else points at a bug or an environment problem.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount { .. } | Error::InsufficientFunds { .. }
        )
    }

    /// Short machine-readable reason, used as a metrics label
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidAmount { .. } => "invalid_amount",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::InvariantViolation(_) => "invariant_violation",
            Error::Concurrency(_) => "concurrency",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_recoverable() {
        let invalid = Error::InvalidAmount {
            amount: Decimal::ZERO,
        };
        let insufficient = Error::InsufficientFunds {
            requested: Decimal::from(10),
            available: Decimal::from(5),
        };

        assert!(invalid.is_rejection());
        assert!(insufficient.is_rejection());
        assert!(!Error::Concurrency("closed".to_string()).is_rejection());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InsufficientFunds {
            requested: Decimal::new(500000, 2),
            available: Decimal::new(112550, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 5000.00, available 1125.50"
        );
        assert_eq!(err.reason(), "insufficient_funds");
    }
}
