//! Loan pricing and repayment schedules.
//!
//! Pure calculations with no access to the ledger: a loan's schedule is
//! computed once, before the loan is stored.

pub mod engine;
pub mod error;

#[cfg(test)]
mod props;

pub use engine::AmortizationEngine;
pub use error::AmortizationError;
