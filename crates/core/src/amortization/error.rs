//! Amortization error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while pricing or scheduling a loan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmortizationError {
    /// Intermediate value exceeded the decimal range.
    #[error("Amortization arithmetic overflowed")]
    Overflow,

    /// A due date falls outside the supported calendar.
    #[error("Due date {months} months after {start} is out of range")]
    DueDateOutOfRange {
        /// Disbursement date.
        start: NaiveDate,
        /// Month offset that could not be represented.
        months: u32,
    },
}
