//! Generators for customer-facing account and card identifiers.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Prefix of every account number.
pub const ACCOUNT_NUMBER_PREFIX: &str = "40817810";

/// Years a newly issued card stays valid.
pub const CARD_VALIDITY_YEARS: i32 = 4;

/// 20-digit account number: the fixed prefix and ten random digits.
pub fn account_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let serial: u64 = rng.gen_range(1_000_000_000..10_000_000_000);
    format!("{ACCOUNT_NUMBER_PREFIX}{serial:010}")
}

/// 16-digit card number starting with `4`.
pub fn card_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let issuer: u32 = rng.gen_range(100..1_000);
    let groups: [u32; 3] = [
        rng.gen_range(0..10_000),
        rng.gen_range(0..10_000),
        rng.gen_range(0..10_000),
    ];
    format!(
        "4{issuer:03}{:04}{:04}{:04}",
        groups[0], groups[1], groups[2]
    )
}

/// 3-digit card verification value.
pub fn cvv<R: Rng + ?Sized>(rng: &mut R) -> String {
    let value: u32 = rng.gen_range(100..1_000);
    format!("{value:03}")
}

/// Expiry `(month, year)` for a card issued on `issued_on`.
#[must_use]
pub fn card_expiry(issued_on: NaiveDate) -> (u32, i32) {
    (issued_on.month(), issued_on.year() + CARD_VALIDITY_YEARS)
}
