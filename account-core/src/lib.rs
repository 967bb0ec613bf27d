//! Account Core
//!
//! A single account holding an exact-decimal balance and an append-only
//! transaction history.
//!
//! # Architecture
//!
//! - **State transitions**: `AccountState` is the only code that changes balance or history
//! - **Shared access**: `Account` guards the state with one `RwLock`
//! - **Single writer**: `actor::spawn_account_actor` serves the same operations from one task
//! - **Presentation**: `display` formats values; the core never prints
//!
//! # Invariants
//!
//! - Balance is never negative
//! - Balance equals the last record's resulting balance (zero with no history)
//! - Append-only: records are never modified or removed
//! - Linearizable: history order is commit order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod account;
pub mod actor;
pub mod config;
pub mod display;
pub mod error;
pub mod metrics;
pub mod state;
pub mod types;

// Re-exports
pub use account::Account;
pub use actor::{spawn_account_actor, spawn_account_actor_with_metrics, AccountHandle};
pub use config::Config;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use state::AccountState;
pub use types::{AccountId, TransactionKind, TransactionRecord};
