//! Property-based tests for the amortization engine.
//!
//! - Principal parts sum to the principal exactly
//! - Every installment is its principal plus its interest
//! - Due dates are strictly increasing, one month apart from disbursement

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::Money;

use super::engine::AmortizationEngine;

/// Strategy for principals (1.00 to 10,000,000.00).
fn principal() -> impl Strategy<Value = Money> {
    (100i64..1_000_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for annual rates (0.00% to 50.00%).
fn annual_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=5_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

/// Strategy for terms (1 to 360 months).
fn term() -> impl Strategy<Value = u32> {
    1u32..=360
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_principal_parts_sum_to_principal(
        principal in principal(),
        rate in annual_rate(),
        term in term(),
    ) {
        let schedule = AmortizationEngine::generate_schedule(principal, rate, term, start()).unwrap();
        let total: Money = schedule.iter().map(|p| p.principal_part).sum();
        prop_assert_eq!(total, principal);
    }

    #[test]
    fn prop_amount_is_principal_plus_interest(
        principal in principal(),
        rate in annual_rate(),
        term in term(),
    ) {
        let schedule = AmortizationEngine::generate_schedule(principal, rate, term, start()).unwrap();

        for entry in &schedule {
            prop_assert_eq!(entry.amount, entry.principal_part + entry.interest_part);
            prop_assert!(!entry.principal_part.is_negative());
            prop_assert!(!entry.interest_part.is_negative());
        }

        let amounts: Money = schedule.iter().map(|p| p.amount).sum();
        let parts: Money = schedule
            .iter()
            .map(|p| p.principal_part + p.interest_part)
            .sum();
        prop_assert_eq!(amounts, parts);
    }

    #[test]
    fn prop_schedule_shape(
        principal in principal(),
        rate in annual_rate(),
        term in term(),
    ) {
        let schedule = AmortizationEngine::generate_schedule(principal, rate, term, start()).unwrap();

        prop_assert!(!schedule.is_empty());
        prop_assert!(schedule.len() <= term as usize);
        prop_assert!(schedule[0].due_date > start());
        for pair in schedule.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    #[test]
    fn prop_payment_is_rounded_to_cents(
        principal in principal(),
        rate in annual_rate(),
        term in term(),
    ) {
        let payment = AmortizationEngine::monthly_payment(principal, rate, term).unwrap();
        prop_assert_eq!(payment, payment.round_currency());
        prop_assert!(!payment.is_negative());
    }
}
