//! Core business logic for Tally.
//!
//! This crate contains the ledger and everything that moves money through it,
//! with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `ledger` - Lock-guarded store, entities and the transaction journal
//! - `amortization` - Loan payment and schedule calculation
//! - `rates` - Cached base interest rate lookup with fallback
//! - `notify` - Customer notification seam
//! - `banking` - Payment, transfer, deposit and loan protocols
//! - `reports` - Financial summaries and account history

pub mod amortization;
pub mod banking;
pub mod ledger;
pub mod notify;
pub mod rates;
pub mod reports;
