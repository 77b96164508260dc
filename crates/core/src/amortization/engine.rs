//! Annuity pricing and schedule generation.
//!
//! All intermediate values keep full decimal precision. Rounding to the
//! currency scale happens only for the payment, each interest part, and the
//! reconciled final installment.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use tally_shared::Money;

use super::error::AmortizationError;
use crate::ledger::ScheduledPayment;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Engine for fixed-payment loan calculations.
pub struct AmortizationEngine;

impl AmortizationEngine {
    /// Converts an annual percentage into a monthly fraction.
    ///
    /// `15` (percent a year) becomes `0.0125`.
    #[must_use]
    pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
        annual_rate_percent / MONTHS_PER_YEAR / Decimal::ONE_HUNDRED
    }

    /// Computes the fixed monthly installment.
    ///
    /// Uses the annuity formula
    /// `P * r * (1 + r)^n / ((1 + r)^n - 1)` rounded half-even to cents.
    /// A zero rate splits the principal evenly; a zero term yields zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::amortization::AmortizationEngine;
    /// use tally_shared::Money;
    ///
    /// let payment = AmortizationEngine::monthly_payment(Money::new(dec!(120000)), dec!(15), 12);
    /// assert_eq!(payment, Ok(Money::new(dec!(10831.00))));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if an intermediate value leaves the decimal range.
    pub fn monthly_payment(
        principal: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> Result<Money, AmortizationError> {
        if term_months == 0 {
            return Ok(Money::ZERO);
        }

        let rate = Self::monthly_rate(annual_rate_percent);
        if rate.is_zero() {
            return principal
                .checked_div(Decimal::from(term_months))
                .map(Money::round_currency)
                .ok_or(AmortizationError::Overflow);
        }

        let growth = (Decimal::ONE + rate)
            .checked_powu(u64::from(term_months))
            .ok_or(AmortizationError::Overflow)?;
        let payment = principal
            .amount()
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(growth))
            .and_then(|v| v.checked_div(growth - Decimal::ONE))
            .ok_or(AmortizationError::Overflow)?;

        Ok(Money::new(payment).round_currency())
    }

    /// Builds the repayment schedule, one entry per month.
    ///
    /// Each entry's interest is the remaining principal times the monthly
    /// rate, rounded to cents; the rest of the installment repays principal.
    /// The last month, or any month whose installment would overshoot the
    /// remaining principal, repays exactly what is left, so the principal
    /// parts always sum to `principal`. The schedule ends as soon as nothing
    /// is left. The first payment is due one month after `start_date`.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` from payment pricing, or `DueDateOutOfRange` if a
    /// due date cannot be represented.
    pub fn generate_schedule(
        principal: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
        start_date: NaiveDate,
    ) -> Result<Vec<ScheduledPayment>, AmortizationError> {
        let payment = Self::monthly_payment(principal, annual_rate_percent, term_months)?;
        let rate = Self::monthly_rate(annual_rate_percent);

        let mut schedule = Vec::with_capacity(usize::try_from(term_months).unwrap_or_default());
        let mut remaining = principal;

        for month in 1..=term_months {
            if !remaining.is_positive() {
                break;
            }

            let interest_part = (remaining * rate).round_currency();
            let mut principal_part = payment - interest_part;
            let mut amount = payment;

            if month == term_months || !(remaining - principal_part).is_positive() {
                principal_part = remaining;
                amount = (principal_part + interest_part).round_currency();
            }
            remaining -= principal_part;

            let due_date = start_date
                .checked_add_months(Months::new(month))
                .ok_or(AmortizationError::DueDateOutOfRange {
                    start: start_date,
                    months: month,
                })?;

            schedule.push(ScheduledPayment {
                due_date,
                amount,
                principal_part,
                interest_part,
                paid: false,
            });
        }

        Ok(schedule)
    }
}
