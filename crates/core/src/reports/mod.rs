//! Read-side reports over the ledger.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::FinancialSummary;
