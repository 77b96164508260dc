//! Demo seeder for Tally development and testing.
//!
//! Builds one in-memory ledger, seeds two customers and runs every banking
//! protocol once, then logs the resulting summaries.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use tally_core::banking::{
    BankingService, CardPayment, DepositRequest, LoanApplication, TransferRequest,
};
use tally_core::ledger::LedgerStore;
use tally_core::reports::ReportService;
use tally_shared::{AppConfig, AppError, AppResult, Money};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_core=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!(
        base_rate = %config.rates.fixed_base_rate,
        margin = %config.lending.rate_margin,
        "Configuration loaded"
    );

    let store = Arc::new(LedgerStore::new());
    let banking = BankingService::from_config(Arc::clone(&store), &config);

    seed(&banking, &store).context("Seeding failed")?;

    tracing::info!(transactions = store.transaction_count(), "Seeding complete");
    Ok(())
}

fn seed(banking: &BankingService, store: &LedgerStore) -> AppResult<()> {
    let alice = banking.register_user("alice", "alice@example.com")?;
    let bob = banking.register_user("bob", "bob@example.com")?;

    let alice_account = banking.open_account(alice.id)?;
    let bob_account = banking.open_account(bob.id)?;

    banking.deposit(&DepositRequest {
        to_account_id: alice_account.id,
        amount: Money::from_major(1000),
    })?;
    banking.transfer(&TransferRequest {
        from_account_id: alice_account.id,
        to_account_id: bob_account.id,
        amount: Money::from_major(500),
    })?;

    let card = banking.issue_card(bob_account.id)?;
    let listed = banking.account_cards(bob_account.id)?;
    tracing::info!(account_id = %bob_account.id, cards = listed.len(), "Cards listed");
    banking.pay_with_card(&CardPayment {
        card_number: card.number.clone(),
        amount: Money::new(Decimal::new(4999, 2)),
        merchant: "Corner Bookstore".to_string(),
    })?;

    // Rejections surface as typed errors and leave the ledger untouched
    if let Err(err) = banking.pay_with_card(&CardPayment {
        card_number: card.number,
        amount: Money::from_major(10_000),
        merchant: "Car Dealer".to_string(),
    }) {
        let status = AppError::from(err).status_code();
        tracing::info!(status, "Oversized card payment rejected as expected");
    }

    let loan = banking.apply_for_loan(&LoanApplication {
        user_id: alice.id,
        account_id: alice_account.id,
        amount: Money::from_major(120_000),
        term_months: 12,
    })?;
    if let Some(first) = loan.schedule.first() {
        tracing::info!(
            loan_id = %loan.id,
            installment = %first.amount,
            total = %loan.total_repayment(),
            "Loan schedule generated"
        );
    }

    for user in [&alice, &bob] {
        let summary = ReportService::financial_summary(store, user.id)?;
        let rendered = serde_json::to_string(&summary).map_err(|e| AppError::Internal(e.to_string()))?;
        tracing::info!(username = %user.username, summary = %rendered, "Financial summary");
    }

    Ok(())
}
