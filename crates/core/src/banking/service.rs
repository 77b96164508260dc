//! Banking protocols over a shared ledger store.
//!
//! Every protocol validates its input, then runs all of its checks, balance
//! changes and the journal append inside one exclusive store section.
//! Work that does not touch the store (rate lookup, schedule computation,
//! notifications) happens outside that section.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tally_shared::{AccountId, AppConfig, LoanId, Money, UserId};

use super::numbers;
use super::types::{CardPayment, DepositRequest, LoanApplication, TransferRequest};
use crate::amortization::AmortizationEngine;
use crate::ledger::{
    Account, Card, LedgerError, LedgerResult, LedgerStore, Loan, NewUser, ScheduledPayment,
    Transaction, User,
};
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::rates::{BaseRateProvider, FixedRateSource};

/// Attempts at drawing an unused card number before giving up.
const MAX_CARD_NUMBER_ATTEMPTS: usize = 5;

/// Entry point for every balance-affecting operation.
#[derive(Clone)]
pub struct BankingService {
    store: Arc<LedgerStore>,
    rates: BaseRateProvider,
    notifier: Arc<dyn Notifier>,
    rate_margin: Decimal,
}

impl BankingService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(
        store: Arc<LedgerStore>,
        rates: BaseRateProvider,
        notifier: Arc<dyn Notifier>,
        rate_margin: Decimal,
    ) -> Self {
        Self {
            store,
            rates,
            notifier,
            rate_margin,
        }
    }

    /// Creates a service with the fixed rate source and log notifier from `config`.
    #[must_use]
    pub fn from_config(store: Arc<LedgerStore>, config: &AppConfig) -> Self {
        let source = Arc::new(FixedRateSource::new(config.rates.fixed_base_rate));
        let rates = BaseRateProvider::from_config(source, &config.rates, &config.lending);
        let notifier = Arc::new(LogNotifier::from_config(&config.notifications));

        Self::new(store, rates, notifier, config.lending.rate_margin)
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    // ========== Onboarding ==========

    /// Registers a user and sends a welcome notification.
    ///
    /// # Errors
    ///
    /// `Validation` for empty fields, `UsernameTaken`/`EmailTaken` on conflicts.
    pub fn register_user(&self, username: &str, email: &str) -> LedgerResult<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(LedgerError::Validation(
                "Username and email are required".to_string(),
            ));
        }

        let user = self.store.create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
        })?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        let welcome = Notification::welcome(&user.username, &user.email);
        if let Err(err) = self.notifier.send(&welcome) {
            tracing::warn!(user_id = %user.id, error = %err, "Failed to send welcome notification");
        }

        Ok(user)
    }

    /// Opens a zero-balance account with a generated number.
    ///
    /// # Errors
    ///
    /// `UserNotFound` if the owner does not exist.
    pub fn open_account(&self, user_id: UserId) -> LedgerResult<Account> {
        let number = numbers::account_number(&mut rand::thread_rng());
        let account = self.store.create_account(user_id, number)?;

        tracing::info!(account_id = %account.id, user_id = %user_id, "Account opened");
        Ok(account)
    }

    /// Issues a card for an account. The returned copy has its CVV masked.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    pub fn issue_card(&self, account_id: AccountId) -> LedgerResult<Card> {
        let mut rng = rand::thread_rng();
        let (expiry_month, expiry_year) = numbers::card_expiry(Utc::now().date_naive());

        for _ in 0..MAX_CARD_NUMBER_ATTEMPTS {
            let card = Card::new(
                account_id,
                numbers::card_number(&mut rng),
                numbers::cvv(&mut rng),
                expiry_month,
                expiry_year,
            );

            match self.store.add_card(card) {
                Ok(card) => {
                    tracing::info!(
                        card_id = %card.id,
                        account_id = %account_id,
                        card = %card.number_hint(),
                        "Card issued"
                    );
                    return Ok(card.masked());
                }
                Err(LedgerError::DuplicateCardNumber) => {
                    tracing::debug!(account_id = %account_id, "Card number collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::error!(account_id = %account_id, "Exhausted card number attempts");
        Err(LedgerError::Internal(
            "could not generate a unique card number".to_string(),
        ))
    }

    /// Lists the cards linked to an account with their CVVs masked.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    pub fn account_cards(&self, account_id: AccountId) -> LedgerResult<Vec<Card>> {
        self.store.read(|state| -> LedgerResult<_> {
            state.account(account_id)?;
            Ok(state.cards_of(account_id).iter().map(Card::masked).collect())
        })
    }

    // ========== Money movement ==========

    /// Charges a card.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad amount, `CardNotFound`, `CardExpired`,
    /// `InsufficientFunds`, or `Internal` if the card's account is missing.
    pub fn pay_with_card(&self, payment: &CardPayment) -> LedgerResult<Transaction> {
        validate_amount(payment.amount, "Payment")?;
        let now = Utc::now();

        let (tx, card_hint) = self.store.write(|state| -> LedgerResult<_> {
            let (card_id, account_id, card_hint) = {
                let card = state.card_by_number(&payment.card_number)?;
                if card.is_expired_at(now) {
                    return Err(LedgerError::CardExpired);
                }
                (card.id, card.account_id, card.number_hint())
            };

            let balance = state
                .account(account_id)
                .map_err(|_| {
                    tracing::error!(card_id = %card_id, account_id = %account_id, "Card references a missing account");
                    LedgerError::Internal(format!(
                        "card {card_id} references missing account {account_id}"
                    ))
                })?
                .balance();
            if balance < payment.amount {
                return Err(LedgerError::InsufficientFunds(account_id));
            }

            let tx = Transaction::payment(
                account_id,
                payment.amount,
                format!("Payment to {}", payment.merchant),
            );
            let tx = state.commit(tx)?.clone();
            Ok((tx, card_hint))
        })?;

        tracing::info!(
            transaction_id = %tx.id,
            amount = %tx.amount,
            card = %card_hint,
            merchant = %payment.merchant,
            "Card payment processed"
        );
        Ok(tx)
    }

    /// Moves money between two ledger accounts.
    ///
    /// # Errors
    ///
    /// `Validation` for a same-account transfer or bad amount,
    /// `AccountNotFound` for either side, `InsufficientFunds` on the source.
    pub fn transfer(&self, request: &TransferRequest) -> LedgerResult<Transaction> {
        if request.from_account_id == request.to_account_id {
            return Err(LedgerError::Validation(
                "Cannot transfer to the same account".to_string(),
            ));
        }
        validate_amount(request.amount, "Transfer")?;

        let tx = self.store.write(|state| -> LedgerResult<_> {
            let from = state.account(request.from_account_id)?;
            let to = state.account(request.to_account_id)?;
            if from.balance() < request.amount {
                return Err(LedgerError::InsufficientFunds(from.id));
            }

            let tx = Transaction::transfer(
                from.id,
                to.id,
                request.amount,
                format!("Transfer from {} to {}", from.number, to.number),
            );
            state.commit(tx).cloned()
        })?;

        tracing::info!(
            transaction_id = %tx.id,
            amount = %tx.amount,
            from = %request.from_account_id,
            to = %request.to_account_id,
            "Transfer completed"
        );
        Ok(tx)
    }

    /// Credits external money to an account.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad amount, `AccountNotFound`.
    pub fn deposit(&self, request: &DepositRequest) -> LedgerResult<Transaction> {
        validate_amount(request.amount, "Deposit")?;

        let tx = self.store.write(|state| -> LedgerResult<_> {
            let account = state.account(request.to_account_id)?;
            let tx = Transaction::deposit(
                account.id,
                request.amount,
                format!("Deposit to account {}", account.number),
            );
            state.commit(tx).cloned()
        })?;

        tracing::info!(
            transaction_id = %tx.id,
            amount = %tx.amount,
            account_id = %request.to_account_id,
            "Deposit completed"
        );
        Ok(tx)
    }

    // ========== Lending ==========

    /// Approves a loan and disburses its principal.
    ///
    /// The base rate comes from the rate provider (which falls back on its
    /// own) plus the configured margin. The schedule is computed before the
    /// store is locked; storing the loan, crediting the account and
    /// recording the disbursement then happen in one exclusive section.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad amount or zero term, `UserNotFound`,
    /// `AccountNotFound`, `BalanceOverflow` if the credit does not fit.
    pub fn apply_for_loan(&self, application: &LoanApplication) -> LedgerResult<Loan> {
        validate_amount(application.amount, "Loan amount")?;
        if application.term_months == 0 {
            return Err(LedgerError::Validation(
                "Loan term must be positive".to_string(),
            ));
        }

        let annual_rate = self.rates.current_rate() + self.rate_margin;
        let start_date = Utc::now().date_naive();
        let schedule = AmortizationEngine::generate_schedule(
            application.amount,
            annual_rate,
            application.term_months,
            start_date,
        )
        .map_err(|err| LedgerError::Validation(err.to_string()))?;

        let loan = Loan {
            id: LoanId::new(),
            user_id: application.user_id,
            account_id: application.account_id,
            principal: application.amount,
            annual_rate,
            term_months: application.term_months,
            start_date,
            schedule,
            remaining_amount: application.amount,
        };
        let disbursement = Transaction::loan_disbursement(
            loan.account_id,
            loan.principal,
            format!("Loan disbursement (ID: {})", loan.id),
        );

        let loan = self.store.write(|state| -> LedgerResult<_> {
            state.user(loan.user_id)?;
            state.account(loan.account_id)?;
            disbursement.validate()?;

            // The credit can still fail, so money moves before the loan is stored
            state.commit(disbursement)?;
            state.insert_loan(loan).cloned()
        })?;

        tracing::info!(
            loan_id = %loan.id,
            user_id = %loan.user_id,
            account_id = %loan.account_id,
            amount = %loan.principal,
            rate = %loan.annual_rate,
            term_months = loan.term_months,
            "Loan approved and disbursed"
        );
        Ok(loan)
    }

    /// Returns the repayment schedule of a loan.
    ///
    /// # Errors
    ///
    /// `LoanNotFound`.
    pub fn loan_schedule(&self, loan_id: LoanId) -> LedgerResult<Vec<ScheduledPayment>> {
        self.store.get_loan(loan_id).map(|loan| loan.schedule)
    }
}

/// Rejects non-positive amounts and amounts finer than a cent.
fn validate_amount(amount: Money, what: &str) -> LedgerResult<()> {
    if !amount.is_positive() {
        return Err(LedgerError::Validation(format!("{what} must be positive")));
    }
    if amount != amount.round_currency() {
        return Err(LedgerError::Validation(format!(
            "{what} must have at most two decimal places"
        )));
    }
    Ok(())
}
