//! Property and concurrency tests for `LedgerStore`.
//!
//! - Balance equals the sum of applied deltas
//! - Concurrent writers never lose an update
//! - Readers never observe a half-applied commit

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::Money;

use super::error::LedgerResult;
use super::store::LedgerStore;
use super::transaction::Transaction;
use super::types::NewUser;

/// Strategy for signed deltas (-1,000.00 to 1,000.00).
fn signed_delta() -> impl Strategy<Value = Money> {
    (-100_000i64..=100_000i64).prop_map(Money::from_minor)
}

/// Strategy for positive amounts (0.01 to 1,000.00).
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..=100_000i64).prop_map(Money::from_minor)
}

fn seeded_store(accounts: usize) -> (LedgerStore, Vec<tally_shared::AccountId>) {
    let store = LedgerStore::new();
    let user = store
        .create_user(NewUser {
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
        })
        .unwrap();
    let ids = (0..accounts)
        .map(|i| {
            store
                .create_account(user.id, format!("4081781000000000{i:04}"))
                .unwrap()
                .id
        })
        .collect();
    (store, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balance_is_sum_of_deltas(deltas in prop::collection::vec(signed_delta(), 0..40)) {
        let (store, ids) = seeded_store(1);
        let expected: Money = deltas.iter().sum();

        for delta in &deltas {
            store.mutate_balance(ids[0], *delta).unwrap();
        }

        prop_assert_eq!(store.get_account(ids[0]).unwrap().balance(), expected);
    }

    #[test]
    fn prop_committed_transfers_conserve_total(
        amounts in prop::collection::vec((positive_amount(), 0usize..3, 0usize..3), 1..30)
    ) {
        let (store, ids) = seeded_store(3);
        for id in &ids {
            store.mutate_balance(*id, Money::new(dec!(10000))).unwrap();
        }

        for (amount, from, to) in amounts {
            if from == to {
                continue;
            }
            let tx = Transaction::transfer(ids[from], ids[to], amount, "");
            store.write(|state| state.commit(tx).map(|_| ())).unwrap();
        }

        let total: Money = ids
            .iter()
            .map(|id| store.get_account(*id).unwrap().balance())
            .sum();
        prop_assert_eq!(total, Money::new(dec!(30000)));
    }

    #[test]
    fn prop_history_matches_commits(count in 1usize..20) {
        let (store, ids) = seeded_store(2);
        for i in 0..count {
            let tx = if i % 2 == 0 {
                Transaction::deposit(ids[0], Money::ONE, "")
            } else {
                Transaction::transfer(ids[0], ids[1], Money::ONE, "")
            };
            store.write(|state| state.commit(tx).map(|_| ())).unwrap();
        }

        prop_assert_eq!(store.get_account_transactions(ids[0]).len(), count);
        prop_assert_eq!(store.get_account_transactions(ids[1]).len(), count / 2);
        prop_assert_eq!(store.transaction_count(), count);
    }
}

#[test]
fn test_concurrent_deposits_and_withdrawals_are_not_lost() {
    let (store, ids) = seeded_store(1);
    let store = Arc::new(store);
    let account = ids[0];

    // Four depositors add 3.00 and four withdrawers take 1.25, 250 times each
    std::thread::scope(|scope| {
        for worker in 0..8 {
            let store = Arc::clone(&store);
            let delta = if worker % 2 == 0 {
                Money::new(dec!(3.00))
            } else {
                Money::new(dec!(-1.25))
            };
            scope.spawn(move || {
                for _ in 0..250 {
                    store.mutate_balance(account, delta).unwrap();
                }
            });
        }
    });

    let expected = Money::new(Decimal::from(1000) * dec!(3.00) - Decimal::from(1000) * dec!(1.25));
    assert_eq!(store.get_account(account).unwrap().balance(), expected);
    assert_eq!(expected, Money::new(dec!(1750.00)));
}

#[test]
fn test_concurrent_transfers_keep_total_and_never_overdraw() {
    let (store, ids) = seeded_store(2);
    let (a, b) = (ids[0], ids[1]);
    store.mutate_balance(a, Money::new(dec!(100))).unwrap();
    store.mutate_balance(b, Money::new(dec!(100))).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..6 {
            let store = &store;
            let (from, to) = if worker % 2 == 0 { (a, b) } else { (b, a) };
            scope.spawn(move || {
                for _ in 0..200 {
                    let _ = store.write(|state| -> LedgerResult<()> {
                        let amount = Money::new(dec!(7));
                        if state.account(from)?.balance() < amount {
                            return Ok(());
                        }
                        state
                            .commit(Transaction::transfer(from, to, amount, ""))
                            .map(|_| ())
                    });
                }
            });
        }

        // Readers see both balances from the same instant
        scope.spawn(|| {
            for _ in 0..500 {
                let total = store.read(|state| {
                    state.account(a).map(|x| x.balance()).unwrap_or_default()
                        + state.account(b).map(|x| x.balance()).unwrap_or_default()
                });
                assert_eq!(total, Money::new(dec!(200)));
            }
        });
    });

    let balance_a = store.get_account(a).unwrap().balance();
    let balance_b = store.get_account(b).unwrap().balance();
    assert!(!balance_a.is_negative());
    assert!(!balance_b.is_negative());
    assert_eq!(balance_a + balance_b, Money::new(dec!(200)));
}
