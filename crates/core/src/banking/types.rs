//! Protocol inputs.

use serde::Deserialize;
use tally_shared::{AccountId, Money, UserId};

/// Card charge request.
#[derive(Debug, Clone, Deserialize)]
pub struct CardPayment {
    /// Number of the card to charge.
    pub card_number: String,
    /// Amount to charge.
    pub amount: Money,
    /// Merchant name, recorded in the transaction description.
    pub merchant: String,
}

/// Transfer between two ledger accounts.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TransferRequest {
    /// Debited account.
    pub from_account_id: AccountId,
    /// Credited account.
    pub to_account_id: AccountId,
    /// Amount to move.
    pub amount: Money,
}

/// Deposit of external money.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DepositRequest {
    /// Credited account.
    pub to_account_id: AccountId,
    /// Amount deposited.
    pub amount: Money,
}

/// Loan application.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LoanApplication {
    /// Borrower.
    pub user_id: UserId,
    /// Account receiving the principal.
    pub account_id: AccountId,
    /// Principal requested.
    pub amount: Money,
    /// Number of monthly installments.
    pub term_months: u32,
}
