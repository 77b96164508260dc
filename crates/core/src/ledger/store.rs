//! In-memory ledger store.
//!
//! One readers-writer lock guards every table and index. Lookups take the
//! shared side; any insert or balance change takes the exclusive side.
//! Multi-step protocols run their whole check-then-mutate sequence inside a
//! single [`LedgerStore::write`] call so no other writer can interleave.

use std::collections::HashMap;

use parking_lot::RwLock;
use tally_shared::{AccountId, CardId, LoanId, Money, UserId};

use super::error::{LedgerError, LedgerResult};
use super::journal::Journal;
use super::transaction::Transaction;
use super::types::{Account, Card, Loan, NewUser, User};

/// Tables and secondary indexes. Only reachable through a [`LedgerStore`] guard.
#[derive(Debug, Default)]
pub struct LedgerState {
    users: HashMap<UserId, User>,
    accounts: HashMap<AccountId, Account>,
    cards: HashMap<CardId, Card>,
    loans: HashMap<LoanId, Loan>,
    journal: Journal,
    username_index: HashMap<String, UserId>,
    email_index: HashMap<String, UserId>,
    user_accounts: HashMap<UserId, Vec<AccountId>>,
    account_cards: HashMap<AccountId, Vec<CardId>>,
    card_numbers: HashMap<String, CardId>,
    user_loans: HashMap<UserId, Vec<LoanId>>,
}

impl LedgerState {
    // ========== Users ==========

    /// Registers a user. Username and email must both be unused.
    pub fn insert_user(&mut self, new_user: NewUser) -> LedgerResult<&User> {
        if self.username_index.contains_key(&new_user.username) {
            return Err(LedgerError::UsernameTaken(new_user.username));
        }
        if self.email_index.contains_key(&new_user.email) {
            return Err(LedgerError::EmailTaken(new_user.email));
        }

        let user = User {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            created_at: chrono::Utc::now(),
        };
        let id = user.id;

        self.username_index.insert(user.username.clone(), id);
        self.email_index.insert(user.email.clone(), id);
        Ok(self.users.entry(id).or_insert(user))
    }

    /// Looks up a user.
    pub fn user(&self, id: UserId) -> LedgerResult<&User> {
        self.users.get(&id).ok_or(LedgerError::UserNotFound(id))
    }

    /// Looks up a user by username.
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.username_index
            .get(username)
            .and_then(|id| self.users.get(id))
    }

    // ========== Accounts ==========

    /// Opens a zero-balance account for an existing user.
    pub fn insert_account(&mut self, owner_id: UserId, number: String) -> LedgerResult<&Account> {
        self.user(owner_id)?;

        let account = Account::open(owner_id, number);
        let id = account.id;

        self.user_accounts.entry(owner_id).or_default().push(id);
        Ok(self.accounts.entry(id).or_insert(account))
    }

    /// Looks up an account.
    pub fn account(&self, id: AccountId) -> LedgerResult<&Account> {
        self.accounts.get(&id).ok_or(LedgerError::AccountNotFound(id))
    }

    /// Accounts owned by a user, in opening order.
    #[must_use]
    pub fn accounts_of(&self, user_id: UserId) -> Vec<Account> {
        collect_indexed(&self.user_accounts, &self.accounts, &user_id)
    }

    /// Adds `delta` to an account balance and returns the new balance.
    ///
    /// This is the only path that changes a balance. It does not check for
    /// overdraft; callers check funds inside the same write section. A delta
    /// that would overflow the balance is rejected and changes nothing.
    pub fn apply_delta(&mut self, id: AccountId, delta: Money) -> LedgerResult<Money> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.apply_delta(delta).ok_or_else(|| {
            tracing::warn!(account_id = %id, delta = %delta, "Balance change would overflow");
            LedgerError::BalanceOverflow(id)
        })
    }

    // ========== Cards ==========

    /// Adds a card to an existing account. Card numbers are unique.
    pub fn insert_card(&mut self, card: Card) -> LedgerResult<&Card> {
        self.account(card.account_id)?;
        if self.card_numbers.contains_key(&card.number) {
            return Err(LedgerError::DuplicateCardNumber);
        }

        let id = card.id;
        self.card_numbers.insert(card.number.clone(), id);
        self.account_cards.entry(card.account_id).or_default().push(id);
        Ok(self.cards.entry(id).or_insert(card))
    }

    /// Looks up a card by its number.
    pub fn card_by_number(&self, number: &str) -> LedgerResult<&Card> {
        self.card_numbers
            .get(number)
            .and_then(|id| self.cards.get(id))
            .ok_or(LedgerError::CardNotFound)
    }

    /// Cards linked to an account, in issue order.
    #[must_use]
    pub fn cards_of(&self, account_id: AccountId) -> Vec<Card> {
        collect_indexed(&self.account_cards, &self.cards, &account_id)
    }

    // ========== Loans ==========

    /// Stores a loan. Borrower and disbursement account must exist.
    pub fn insert_loan(&mut self, loan: Loan) -> LedgerResult<&Loan> {
        self.user(loan.user_id)?;
        self.account(loan.account_id)?;

        let id = loan.id;
        self.user_loans.entry(loan.user_id).or_default().push(id);
        Ok(self.loans.entry(id).or_insert(loan))
    }

    /// Looks up a loan.
    pub fn loan(&self, id: LoanId) -> LedgerResult<&Loan> {
        self.loans.get(&id).ok_or(LedgerError::LoanNotFound(id))
    }

    /// Loans taken by a user, in approval order.
    #[must_use]
    pub fn loans_of(&self, user_id: UserId) -> Vec<Loan> {
        collect_indexed(&self.user_loans, &self.loans, &user_id)
    }

    // ========== Journal ==========

    /// Appends a record without touching balances.
    pub fn record(&mut self, tx: Transaction) -> LedgerResult<&Transaction> {
        self.journal.append(tx)
    }

    /// Applies the balance changes a record describes and appends it.
    ///
    /// All-or-nothing: the record is validated, every referenced account
    /// resolved and every new balance computed before the first balance moves.
    pub fn commit(&mut self, tx: Transaction) -> LedgerResult<&Transaction> {
        tx.validate()?;
        let deltas = tx.deltas();

        let mut projected: Vec<(AccountId, Money)> = Vec::with_capacity(deltas.len());
        for (account_id, delta) in &deltas {
            let current = match projected.iter().find(|(id, _)| id == account_id) {
                Some((_, balance)) => *balance,
                None => self.account(*account_id)?.balance(),
            };
            let next = current
                .checked_add(*delta)
                .ok_or(LedgerError::BalanceOverflow(*account_id))?;
            projected.retain(|(id, _)| id != account_id);
            projected.push((*account_id, next));
        }

        for (account_id, delta) in deltas {
            self.apply_delta(account_id, delta)?;
        }
        self.journal.append(tx)
    }

    /// The transaction journal.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

/// Resolves an id-list index into cloned entities, skipping dangling ids.
fn collect_indexed<K, I, V>(index: &HashMap<K, Vec<I>>, table: &HashMap<I, V>, key: &K) -> Vec<V>
where
    K: std::hash::Hash + Eq,
    I: std::hash::Hash + Eq,
    V: Clone,
{
    index
        .get(key)
        .map(|ids| ids.iter().filter_map(|id| table.get(id).cloned()).collect())
        .unwrap_or_default()
}

/// Shared ledger store.
///
/// Constructed once by the process entry point and handed to every service;
/// there is no global instance. All reads return clones.
#[derive(Debug, Default)]
pub struct LedgerStore {
    state: RwLock<LedgerState>,
}

impl LedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` under shared access.
    pub fn read<R>(&self, f: impl FnOnce(&LedgerState) -> R) -> R {
        f(&self.state.read())
    }

    /// Runs `f` under exclusive access. Everything `f` checks and changes is
    /// one atomic step with respect to every other store operation.
    pub fn write<R>(&self, f: impl FnOnce(&mut LedgerState) -> R) -> R {
        f(&mut self.state.write())
    }

    /// Registers a user; fails with a conflict on a taken username or email.
    pub fn create_user(&self, new_user: NewUser) -> LedgerResult<User> {
        self.write(|state| state.insert_user(new_user).cloned())
    }

    /// Returns a user.
    pub fn get_user(&self, id: UserId) -> LedgerResult<User> {
        self.read(|state| state.user(id).cloned())
    }

    /// Returns a user by username.
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.read(|state| state.user_by_username(username).cloned())
    }

    /// Opens a zero-balance account for `owner_id`.
    pub fn create_account(&self, owner_id: UserId, number: String) -> LedgerResult<Account> {
        self.write(|state| state.insert_account(owner_id, number).cloned())
    }

    /// Returns an account.
    pub fn get_account(&self, id: AccountId) -> LedgerResult<Account> {
        self.read(|state| state.account(id).cloned())
    }

    /// Returns the accounts owned by a user.
    pub fn get_user_accounts(&self, user_id: UserId) -> Vec<Account> {
        self.read(|state| state.accounts_of(user_id))
    }

    /// Adds `delta` to an account balance; returns the new balance.
    pub fn mutate_balance(&self, id: AccountId, delta: Money) -> LedgerResult<Money> {
        self.write(|state| state.apply_delta(id, delta))
    }

    /// Adds a card to an existing account.
    pub fn add_card(&self, card: Card) -> LedgerResult<Card> {
        self.write(|state| state.insert_card(card).cloned())
    }

    /// Returns the cards linked to an account.
    pub fn get_account_cards(&self, account_id: AccountId) -> Vec<Card> {
        self.read(|state| state.cards_of(account_id))
    }

    /// Returns the card with the given number.
    pub fn get_card_by_number(&self, number: &str) -> LedgerResult<Card> {
        self.read(|state| state.card_by_number(number).cloned())
    }

    /// Stores a loan record.
    pub fn add_loan(&self, loan: Loan) -> LedgerResult<Loan> {
        self.write(|state| state.insert_loan(loan).cloned())
    }

    /// Returns a loan.
    pub fn get_loan(&self, id: LoanId) -> LedgerResult<Loan> {
        self.read(|state| state.loan(id).cloned())
    }

    /// Returns the loans taken by a user.
    pub fn get_user_loans(&self, user_id: UserId) -> Vec<Loan> {
        self.read(|state| state.loans_of(user_id))
    }

    /// Appends a record to the journal.
    pub fn append_transaction(&self, tx: Transaction) -> LedgerResult<Transaction> {
        self.write(|state| state.record(tx).cloned())
    }

    /// Returns every record touching an account, in append order.
    pub fn get_account_transactions(&self, account_id: AccountId) -> Vec<Transaction> {
        self.read(|state| state.journal().for_account(account_id))
    }

    /// Number of journal records.
    pub fn transaction_count(&self) -> usize {
        self.read(|state| state.journal().len())
    }
}
