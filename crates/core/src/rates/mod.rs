//! Base interest rate lookup.
//!
//! A [`RateSource`] answers with the current base rate in percent.
//! [`BaseRateProvider`] caches the answer and substitutes a fallback when
//! the source fails, so loan approval never blocks on the source.

pub mod error;
pub mod provider;

pub use error::RateError;
pub use provider::{BaseRateProvider, FixedRateSource, RateSource};
