//! End-to-end flow through the public API: onboarding, money movement,
//! lending and reporting against one shared store.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tally_core::banking::{
    BankingService, CardPayment, DepositRequest, LoanApplication, TransferRequest,
};
use tally_core::ledger::{ErrorKind, LedgerStore, TransactionType};
use tally_core::reports::ReportService;
use tally_shared::{AppConfig, AppError, Money};

fn service() -> (Arc<LedgerStore>, BankingService) {
    let store = Arc::new(LedgerStore::new());
    let service = BankingService::from_config(Arc::clone(&store), &AppConfig::default());
    (store, service)
}

#[test]
fn full_customer_lifecycle() {
    let (store, service) = service();

    let alice = service.register_user("alice", "alice@example.com").unwrap();
    let bob = service.register_user("bob", "bob@example.com").unwrap();
    let alice_account = service.open_account(alice.id).unwrap();
    let bob_account = service.open_account(bob.id).unwrap();

    service
        .deposit(&DepositRequest {
            to_account_id: alice_account.id,
            amount: Money::new(dec!(1000.00)),
        })
        .unwrap();
    service
        .transfer(&TransferRequest {
            from_account_id: alice_account.id,
            to_account_id: bob_account.id,
            amount: Money::new(dec!(500.00)),
        })
        .unwrap();

    let card = service.issue_card(bob_account.id).unwrap();
    service
        .pay_with_card(&CardPayment {
            card_number: card.number.clone(),
            amount: Money::new(dec!(120.50)),
            merchant: "Bookstore".to_string(),
        })
        .unwrap();

    // Defaults: fixed base rate 16% plus 5% margin
    let loan = service
        .apply_for_loan(&LoanApplication {
            user_id: alice.id,
            account_id: alice_account.id,
            amount: Money::new(dec!(6000.00)),
            term_months: 6,
        })
        .unwrap();
    assert_eq!(loan.annual_rate, dec!(21));
    let principal: Money = loan.schedule.iter().map(|p| p.principal_part).sum();
    assert_eq!(principal, loan.principal);

    assert_eq!(
        store.get_account(alice_account.id).unwrap().balance(),
        Money::new(dec!(6500.00))
    );
    assert_eq!(
        store.get_account(bob_account.id).unwrap().balance(),
        Money::new(dec!(379.50))
    );

    let history = ReportService::account_history(&store, alice_account.id).unwrap();
    let kinds: Vec<TransactionType> = history.iter().map(|t| t.transaction_type).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionType::LoanDisbursement,
            TransactionType::Transfer,
            TransactionType::Deposit,
        ]
    );

    let summary = ReportService::financial_summary(&store, alice.id).unwrap();
    assert_eq!(summary.total_account_balance, Money::new(dec!(6500.00)));
    assert_eq!(summary.number_of_accounts, 1);
    assert_eq!(summary.total_loan_debt, Money::new(dec!(6000.00)));
    assert_eq!(summary.active_loans, 1);
}

#[test]
fn rejected_payment_leaves_no_trace() {
    let (store, service) = service();
    let user = service.register_user("carol", "carol@example.com").unwrap();
    let account = service.open_account(user.id).unwrap();
    service
        .deposit(&DepositRequest {
            to_account_id: account.id,
            amount: Money::new(dec!(50.00)),
        })
        .unwrap();
    let card = service.issue_card(account.id).unwrap();

    let err = service
        .pay_with_card(&CardPayment {
            card_number: card.number,
            amount: Money::new(dec!(100.00)),
            merchant: "Shop".to_string(),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    let app: AppError = err.into();
    assert_eq!(app.status_code(), 402);

    assert_eq!(
        store.get_account(account.id).unwrap().balance(),
        Money::new(dec!(50.00))
    );
    assert_eq!(store.get_account_transactions(account.id).len(), 1);
}

#[test]
fn money_is_conserved_under_concurrent_traffic() {
    let (store, service) = service();
    let user = service.register_user("dave", "dave@example.com").unwrap();
    let accounts: Vec<_> = (0..4)
        .map(|_| service.open_account(user.id).unwrap().id)
        .collect();
    for id in &accounts {
        service
            .deposit(&DepositRequest {
                to_account_id: *id,
                amount: Money::new(dec!(250.00)),
            })
            .unwrap();
    }

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let service = service.clone();
            let accounts = accounts.clone();
            scope.spawn(move || {
                for step in 0..100 {
                    let from = accounts[(worker + step) % accounts.len()];
                    let to = accounts[(worker + step + 1) % accounts.len()];
                    let _ = service.transfer(&TransferRequest {
                        from_account_id: from,
                        to_account_id: to,
                        amount: Money::new(dec!(13.37)),
                    });
                }
            });
        }
    });

    let total: Money = accounts
        .iter()
        .map(|id| store.get_account(*id).unwrap().balance())
        .sum();
    assert_eq!(total, Money::new(dec!(1000.00)));
    assert!(
        accounts
            .iter()
            .all(|id| !store.get_account(*id).unwrap().balance().is_negative())
    );
}
