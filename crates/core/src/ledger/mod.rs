//! Ledger storage.
//!
//! This module implements the shared in-memory ledger:
//! - Entities (users, accounts, cards, loans)
//! - Transaction records and the append-only journal
//! - The lock-guarded store with its secondary indexes
//! - Error types for ledger operations

pub mod error;
pub mod journal;
pub mod store;
pub mod transaction;
pub mod types;

#[cfg(test)]
mod store_props;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use journal::Journal;
pub use store::{LedgerState, LedgerStore};
pub use transaction::{Transaction, TransactionType};
pub use types::{Account, Card, Loan, NewUser, ScheduledPayment, User};
