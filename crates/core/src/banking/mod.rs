//! Balance-affecting protocols: onboarding, payments, transfers, deposits
//! and loan disbursement.

pub mod numbers;
pub mod service;
pub mod types;


pub use service::BankingService;
pub use types::{CardPayment, DepositRequest, LoanApplication, TransferRequest};
