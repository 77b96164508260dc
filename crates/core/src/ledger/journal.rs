//! Append-only transaction journal.
//!
//! Records are never mutated or removed once appended. An account index is
//! maintained on append so per-account history is a lookup, not a scan.

use std::collections::HashMap;

use tally_shared::AccountId;

use super::error::LedgerResult;
use super::transaction::Transaction;

/// Append-only log of every balance-affecting event.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<Transaction>,
    by_account: HashMap<AccountId, Vec<usize>>,
}

impl Journal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a record.
    pub fn append(&mut self, tx: Transaction) -> LedgerResult<&Transaction> {
        tx.validate()?;

        let position = self.entries.len();
        for account_id in [tx.from_account_id, tx.to_account_id].into_iter().flatten() {
            self.by_account.entry(account_id).or_default().push(position);
        }
        self.entries.push(tx);

        Ok(&self.entries[position])
    }

    /// Records touching `account_id`, in append order.
    #[must_use]
    pub fn for_account(&self, account_id: AccountId) -> Vec<Transaction> {
        self.by_account
            .get(&account_id)
            .map(|positions| positions.iter().map(|&i| self.entries[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
