//! Report generation service.

use tally_shared::{AccountId, Money, UserId};

use super::types::FinancialSummary;
use crate::ledger::{LedgerError, LedgerResult, LedgerStore, Transaction};

/// Stateless report builder.
pub struct ReportService;

impl ReportService {
    /// Summarizes a user's balances and loan debt.
    ///
    /// Everything is read in one shared section, so the figures describe a
    /// single ledger state.
    ///
    /// # Errors
    ///
    /// `UserNotFound` if the user does not exist, `Internal` if a total
    /// does not fit in a decimal.
    pub fn financial_summary(store: &LedgerStore, user_id: UserId) -> LedgerResult<FinancialSummary> {
        let summary = store.read(|state| -> LedgerResult<_> {
            state.user(user_id)?;
            let accounts = state.accounts_of(user_id);
            let loans = state.loans_of(user_id);

            Ok(FinancialSummary {
                user_id,
                total_account_balance: checked_total(accounts.iter().map(|a| a.balance()))?,
                number_of_accounts: accounts.len(),
                total_loan_debt: checked_total(loans.iter().map(|l| l.remaining_amount))?,
                active_loans: loans.iter().filter(|l| l.is_active()).count(),
            })
        })?;

        tracing::debug!(user_id = %user_id, "Generated financial summary");
        Ok(summary)
    }

    /// Every transaction touching an account, newest first.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    pub fn account_history(
        store: &LedgerStore,
        account_id: AccountId,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut history = store.read(|state| -> LedgerResult<_> {
            state.account(account_id)?;
            Ok(state.journal().for_account(account_id))
        })?;

        // Stable sort keeps later appends first among equal timestamps
        history.reverse();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        tracing::debug!(account_id = %account_id, count = history.len(), "Fetched account history");
        Ok(history)
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Money>) -> LedgerResult<Money> {
    amounts
        .try_fold(Money::ZERO, Money::checked_add)
        .ok_or_else(|| LedgerError::Internal("report total overflows".to_string()))
}
