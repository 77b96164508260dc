//! Rate lookup error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors a rate source can report.
#[derive(Debug, Error)]
pub enum RateError {
    /// The source could not be reached or answered with garbage.
    #[error("Rate source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with a rate that cannot price a loan.
    #[error("Invalid base rate: {0}")]
    InvalidRate(Decimal),
}
