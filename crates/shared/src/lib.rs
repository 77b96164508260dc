//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Money type with exact decimal precision
//! - Typed IDs for type-safe entity references
//! - Boundary error type
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LendingConfig, NotificationConfig, RateConfig};
pub use error::{AppError, AppResult};
pub use types::{AccountId, CardId, LoanId, Money, TransactionId, UserId};
