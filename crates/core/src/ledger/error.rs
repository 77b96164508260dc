//! Ledger error types.
//!
//! Every store operation and banking protocol returns `LedgerError`.
//! `kind()` groups the variants into the categories callers branch on.

use tally_shared::{AccountId, AppError, LoanId, UserId};
use thiserror::Error;

/// Result type alias using `LedgerError`.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Category of a ledger error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input.
    Validation,
    /// Referenced entity is absent.
    NotFound,
    /// Uniqueness violation.
    Conflict,
    /// Balance precondition failed.
    InsufficientFunds,
    /// Card past expiry.
    ExpiredInstrument,
    /// Store invariant violated.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    // ========== Lookup Errors ==========
    /// User not found.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// Account not found.
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// Card not found. The number is deliberately not echoed back.
    #[error("Card not found")]
    CardNotFound,

    /// Loan not found.
    #[error("Loan {0} not found")]
    LoanNotFound(LoanId),

    // ========== Conflict Errors ==========
    /// Username already registered.
    #[error("Username '{0}' already taken")]
    UsernameTaken(String),

    /// Email already registered.
    #[error("Email '{0}' already registered")]
    EmailTaken(String),

    /// Card number collides with an issued card.
    #[error("Card number already issued")]
    DuplicateCardNumber,

    // ========== Funds Errors ==========
    /// Account balance is lower than the requested debit.
    #[error("Insufficient funds in account {0}")]
    InsufficientFunds(AccountId),

    /// Card is past its expiry.
    #[error("Card expired")]
    CardExpired,

    /// Applying the change would push a balance outside the representable range.
    #[error("Balance of account {0} would overflow")]
    BalanceOverflow(AccountId),

    // ========== Internal Errors ==========
    /// Store invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::BalanceOverflow(_) => ErrorKind::Validation,
            Self::UserNotFound(_)
            | Self::AccountNotFound(_)
            | Self::CardNotFound
            | Self::LoanNotFound(_) => ErrorKind::NotFound,
            Self::UsernameTaken(_) | Self::EmailTaken(_) | Self::DuplicateCardNumber => {
                ErrorKind::Conflict
            }
            Self::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            Self::CardExpired => ErrorKind::ExpiredInstrument,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::LoanNotFound(_) => "LOAN_NOT_FOUND",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::DuplicateCardNumber => "DUPLICATE_CARD_NUMBER",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::CardExpired => "CARD_EXPIRED",
            Self::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::InsufficientFunds => Self::InsufficientFunds(message),
            ErrorKind::ExpiredInstrument => Self::ExpiredInstrument(message),
            ErrorKind::Internal => {
                tracing::error!(error = %message, code = err.error_code(), "Ledger internal error");
                Self::Internal("internal error".to_string())
            }
        }
    }
}
