//! Journal transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::{AccountId, Money, TransactionId};

use super::error::LedgerError;

/// Kind of balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Card charge; money leaves the ledger.
    Payment,
    /// Movement between two ledger accounts.
    Transfer,
    /// External money entering an account.
    Deposit,
    /// Loan principal credited to the borrower.
    LoanDisbursement,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => write!(f, "payment"),
            Self::Transfer => write!(f, "transfer"),
            Self::Deposit => write!(f, "deposit"),
            Self::LoanDisbursement => write!(f, "loan_disbursement"),
        }
    }
}

/// An immutable audit record of one balance-affecting event.
///
/// Payments have only a source account, deposits and disbursements only a
/// destination, transfers both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Debited account, if money left one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<AccountId>,
    /// Credited account, if money entered one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<AccountId>,
    /// Amount moved. Always positive.
    pub amount: Money,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Event kind.
    pub transaction_type: TransactionType,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Transaction {
    fn record(
        transaction_type: TransactionType,
        from_account_id: Option<AccountId>,
        to_account_id: Option<AccountId>,
        amount: Money,
        description: String,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            from_account_id,
            to_account_id,
            amount,
            timestamp: Utc::now(),
            transaction_type,
            description,
        }
    }

    /// A card payment out of `from`.
    #[must_use]
    pub fn payment(from: AccountId, amount: Money, description: impl Into<String>) -> Self {
        Self::record(
            TransactionType::Payment,
            Some(from),
            None,
            amount,
            description.into(),
        )
    }

    /// A transfer from `from` to `to`.
    #[must_use]
    pub fn transfer(
        from: AccountId,
        to: AccountId,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self::record(
            TransactionType::Transfer,
            Some(from),
            Some(to),
            amount,
            description.into(),
        )
    }

    /// A deposit into `to`.
    #[must_use]
    pub fn deposit(to: AccountId, amount: Money, description: impl Into<String>) -> Self {
        Self::record(
            TransactionType::Deposit,
            None,
            Some(to),
            amount,
            description.into(),
        )
    }

    /// A loan disbursement into `to`.
    #[must_use]
    pub fn loan_disbursement(to: AccountId, amount: Money, description: impl Into<String>) -> Self {
        Self::record(
            TransactionType::LoanDisbursement,
            None,
            Some(to),
            amount,
            description.into(),
        )
    }

    /// Returns true if the transaction debits or credits `account_id`.
    #[must_use]
    pub fn involves(&self, account_id: AccountId) -> bool {
        self.from_account_id == Some(account_id) || self.to_account_id == Some(account_id)
    }

    /// Balance changes this record stands for, as `(account, delta)` pairs.
    #[must_use]
    pub fn deltas(&self) -> Vec<(AccountId, Money)> {
        let mut deltas = Vec::with_capacity(2);
        if let Some(from) = self.from_account_id {
            deltas.push((from, -self.amount));
        }
        if let Some(to) = self.to_account_id {
            deltas.push((to, self.amount));
        }
        deltas
    }

    /// Checks the amount and the account shape for the transaction type.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_positive() {
            return Err(LedgerError::Validation(
                "transaction amount must be positive".to_string(),
            ));
        }

        let shape_ok = match self.transaction_type {
            TransactionType::Transfer => match (self.from_account_id, self.to_account_id) {
                (Some(from), Some(to)) => from != to,
                _ => false,
            },
            TransactionType::Payment => {
                self.from_account_id.is_some() && self.to_account_id.is_none()
            }
            TransactionType::Deposit | TransactionType::LoanDisbursement => {
                self.from_account_id.is_none() && self.to_account_id.is_some()
            }
        };

        if shape_ok {
            Ok(())
        } else {
            Err(LedgerError::Validation(format!(
                "{} transaction has invalid source/destination accounts",
                self.transaction_type
            )))
        }
    }
}
