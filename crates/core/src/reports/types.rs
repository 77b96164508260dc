//! Report data types.

use serde::{Deserialize, Serialize};
use tally_shared::{Money, UserId};

/// A user's position across accounts and loans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// User ID.
    pub user_id: UserId,
    /// Sum of all account balances.
    pub total_account_balance: Money,
    /// Number of accounts held.
    pub number_of_accounts: usize,
    /// Sum of outstanding loan amounts.
    pub total_loan_debt: Money,
    /// Loans with an outstanding amount.
    pub active_loans: usize,
}
