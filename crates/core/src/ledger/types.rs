//! Ledger entities.
//!
//! The store owns every entity; callers only ever receive clones, so
//! mutating a returned value never touches stored state.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::{AccountId, CardId, LoanId, Money, UserId};

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login name, unique across the ledger.
    pub username: String,
    /// Contact address, unique across the ledger.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Input for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Requested username.
    pub username: String,
    /// Contact email.
    pub email: String,
}

/// A customer account holding a balance.
///
/// The balance is private: it only changes through the store's balance
/// mutation path, never by assignment from caller-computed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning user.
    pub owner_id: UserId,
    /// Human-facing account number.
    pub number: String,
    balance: Money,
    /// Opening time.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Opens an empty account.
    pub(crate) fn open(owner_id: UserId, number: String) -> Self {
        Self {
            id: AccountId::new(),
            owner_id,
            number,
            balance: Money::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Balance after adding `delta`, or `None` if it would overflow.
    #[must_use]
    pub fn balance_after(&self, delta: Money) -> Option<Money> {
        self.balance.checked_add(delta)
    }

    /// Adds `delta`; leaves the balance untouched and returns `None` on overflow.
    pub(crate) fn apply_delta(&mut self, delta: Money) -> Option<Money> {
        self.balance = self.balance_after(delta)?;
        Some(self.balance)
    }
}

/// A payment card linked to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,
    /// Account charged by this card.
    pub account_id: AccountId,
    /// 16-digit card number.
    pub number: String,
    /// Expiry month (1-12).
    pub expiry_month: u32,
    /// Expiry year.
    pub expiry_year: i32,
    /// Card verification value.
    pub cvv: String,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Creates a card record. The store checks the account when the card is added.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        number: String,
        cvv: String,
        expiry_month: u32,
        expiry_year: i32,
    ) -> Self {
        Self {
            id: CardId::new(),
            account_id,
            number,
            expiry_month,
            expiry_year,
            cvv,
            created_at: Utc::now(),
        }
    }

    /// The last instant the card is usable: 23:59:59 UTC on the last day of
    /// the expiry month. `None` if the expiry fields do not form a date.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let first_of_month = NaiveDate::from_ymd_opt(self.expiry_year, self.expiry_month, 1)?;
        let last_day = first_of_month.checked_add_months(Months::new(1))?.pred_opt()?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        Some(last_day.and_time(end_of_day).and_utc())
    }

    /// Returns true if the card cannot be charged at `now`.
    ///
    /// A card with malformed expiry data counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_none_or(|expiry| now > expiry)
    }

    /// Copy with the CVV hidden, for handing back to callers.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            cvv: "***".to_string(),
            ..self.clone()
        }
    }

    /// First four digits followed by an ellipsis, safe for logs.
    #[must_use]
    pub fn number_hint(&self) -> String {
        let prefix: String = self.number.chars().take(4).collect();
        format!("{prefix}...")
    }
}

/// One entry of a loan repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Date the installment is due.
    pub due_date: NaiveDate,
    /// Total installment (`principal_part + interest_part`).
    pub amount: Money,
    /// Portion repaying principal.
    pub principal_part: Money,
    /// Portion paying interest.
    pub interest_part: Money,
    /// Whether the installment has been collected.
    pub paid: bool,
}

/// An approved installment loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier.
    pub id: LoanId,
    /// Borrower.
    pub user_id: UserId,
    /// Account the principal was disbursed into.
    pub account_id: AccountId,
    /// Amount lent.
    pub principal: Money,
    /// Annual interest rate in percent (base rate plus margin).
    pub annual_rate: Decimal,
    /// Number of monthly installments requested.
    pub term_months: u32,
    /// Disbursement date.
    pub start_date: NaiveDate,
    /// Repayment schedule, in due-date order.
    pub schedule: Vec<ScheduledPayment>,
    /// Outstanding amount. Equal to `principal`; repayment collection is not modelled.
    pub remaining_amount: Money,
}

impl Loan {
    /// Total of all scheduled installments.
    #[must_use]
    pub fn total_repayment(&self) -> Money {
        self.schedule.iter().map(|p| p.amount).sum()
    }

    /// Returns true while any amount is outstanding.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining_amount.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn card_expiring(month: u32, year: i32) -> Card {
        Card::new(
            AccountId::new(),
            "4123456789012345".to_string(),
            "123".to_string(),
            month,
            year,
        )
    }

    #[test]
    fn test_card_expiry_is_end_of_last_day() {
        let card = card_expiring(2, 2028);
        let expiry = card.expires_at().unwrap();
        assert_eq!(expiry, Utc.with_ymd_and_hms(2028, 2, 29, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_card_usable_until_expiry_instant() {
        let card = card_expiring(12, 2026);
        let last_second = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let next_year = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();

        assert!(!card.is_expired_at(last_second));
        assert!(card.is_expired_at(next_year));
    }

    #[test]
    fn test_card_with_bad_month_counts_as_expired() {
        let card = card_expiring(13, 2030);
        assert!(card.expires_at().is_none());
        assert!(card.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_masked_card_hides_cvv() {
        let card = card_expiring(1, 2030);
        let masked = card.masked();
        assert_eq!(masked.cvv, "***");
        assert_eq!(masked.number, card.number);
        assert_eq!(card.number_hint(), "4123...");
    }

    #[test]
    fn test_account_opens_empty() {
        let mut account = Account::open(UserId::new(), "40817810000000000001".to_string());
        assert_eq!(account.balance(), Money::ZERO);
        assert_eq!(
            account.apply_delta(Money::new(dec!(12.50))),
            Some(Money::new(dec!(12.50)))
        );
        assert_eq!(
            account.apply_delta(Money::new(dec!(-2.50))),
            Some(Money::new(dec!(10.00)))
        );
    }

    #[test]
    fn test_overflowing_delta_leaves_balance_untouched() {
        let mut account = Account::open(UserId::new(), "40817810000000000001".to_string());
        account.apply_delta(Money::new(Decimal::MAX)).unwrap();

        assert_eq!(account.balance_after(Money::ONE), None);
        assert_eq!(account.apply_delta(Money::ONE), None);
        assert_eq!(account.balance(), Money::new(Decimal::MAX));
    }
}
