//! Thread-safe ledger for concurrent processing
//!
//! This module provides `AsyncBank`, a ledger that can be shared across
//! threads behind an `Arc`.
//!
//! # Design
//!
//! Clients and accounts live in two `DashMap`s. A deposit or withdrawal holds
//! the account's exclusive entry guard for the whole validate-then-mutate
//! sequence, which makes every account its own lock: operations on different
//! accounts proceed in parallel, operations on one account are serialized and
//! can never interleave between a check and the mutation it guards.
//!
//! # Lock Ordering
//!
//! Whenever both maps are involved the client entry is taken first, then the
//! account entry. No guard is held across an `.await`.

use crate::config::LedgerConfig;
use crate::core::directory::select_account;
use crate::core::traits::Ledger;
use crate::types::{
    Account, AccountKind, AccountNumber, AccountPolicy, Client, ClientRegistration, LedgerError,
    Statement, TaxId, Transaction,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Concurrent in-memory ledger
#[derive(Debug)]
pub struct AsyncBank {
    config: LedgerConfig,
    clients: DashMap<TaxId, Client>,
    accounts: DashMap<AccountNumber, Account>,
    /// Next account number to hand out when none is requested; one past
    /// `AccountNumber::MAX` once every number has been used
    next_number: AtomicU64,
}

impl AsyncBank {
    /// Create an empty AsyncBank using `config` for new accounts
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            clients: DashMap::new(),
            accounts: DashMap::new(),
            next_number: AtomicU64::new(1),
        }
    }

    /// Register an individual client
    ///
    /// The tax ID check and the insertion happen under the same entry lock,
    /// so two racing registrations of one tax ID cannot both succeed.
    pub fn create_client(&self, registration: ClientRegistration) -> Result<(), LedgerError> {
        let tax_id = registration.tax_id.clone();

        match self.clients.entry(tax_id.clone()) {
            Entry::Occupied(_) => return Err(LedgerError::client_already_exists(&tax_id)),
            Entry::Vacant(entry) => {
                entry.insert(Client::individual(registration));
            }
        }

        info!(tax_id = %tax_id, "client registered");
        Ok(())
    }

    /// Open an account for an existing client
    pub fn create_account(
        &self,
        tax_id: &TaxId,
        number: Option<AccountNumber>,
        kind: Option<AccountKind>,
    ) -> Result<AccountNumber, LedgerError> {
        let mut client = self
            .clients
            .get_mut(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        let policy = self.config.policy_for(kind);
        let number = match number {
            Some(number) => self.open_numbered(tax_id, number, policy)?,
            None => self.open_next(tax_id, policy)?,
        };
        client.add_account(number);

        info!(tax_id = %tax_id, account = number, kind = %policy.kind(), "account opened");
        Ok(number)
    }

    fn open_numbered(
        &self,
        owner: &TaxId,
        number: AccountNumber,
        policy: AccountPolicy,
    ) -> Result<AccountNumber, LedgerError> {
        match self.accounts.entry(number) {
            Entry::Occupied(_) => Err(LedgerError::AccountAlreadyExists { number }),
            Entry::Vacant(entry) => {
                entry.insert(Account::new(owner.clone(), number, policy));
                self.next_number
                    .fetch_max(u64::from(number) + 1, Ordering::SeqCst);
                Ok(number)
            }
        }
    }

    fn open_next(
        &self,
        owner: &TaxId,
        policy: AccountPolicy,
    ) -> Result<AccountNumber, LedgerError> {
        loop {
            let next = self
                .next_number
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                    AccountNumber::try_from(next).ok().map(|_| next + 1)
                })
                .map_err(|_| {
                    LedgerError::arithmetic_overflow("account numbering", AccountNumber::MAX)
                })?;
            let number = AccountNumber::try_from(next).map_err(|_| {
                LedgerError::arithmetic_overflow("account numbering", AccountNumber::MAX)
            })?;

            // Skip numbers claimed explicitly in the meantime
            if let Entry::Vacant(entry) = self.accounts.entry(number) {
                entry.insert(Account::new(owner.clone(), number, policy));
                return Ok(number);
            }
        }
    }

    /// Deposit into one of the client's accounts and return the new balance
    pub fn deposit(
        &self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.perform(tax_id, number, Transaction::deposit(amount))
    }

    /// Withdraw from one of the client's accounts and return the new balance
    pub fn withdraw(
        &self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.perform(tax_id, number, Transaction::withdrawal(amount))
    }

    fn perform(
        &self,
        tax_id: &TaxId,
        number: AccountNumber,
        transaction: Transaction,
    ) -> Result<Decimal, LedgerError> {
        let client = self
            .clients
            .get(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        let number = select_account(&client, number)?;

        // Exclusive for the rest of the call
        let mut account = self
            .accounts
            .get_mut(&number)
            .ok_or_else(|| LedgerError::account_not_found(tax_id, number))?;

        client.perform_transaction(account.value_mut(), &transaction)?;

        debug!(
            tax_id = %tax_id,
            account = number,
            kind = %transaction.kind(),
            amount = %transaction.amount(),
            balance = %account.balance(),
            "transaction applied"
        );

        Ok(account.balance())
    }

    /// Statement of one of the client's accounts
    pub fn statement(&self, tax_id: &TaxId, number: AccountNumber) -> Result<Statement, LedgerError> {
        let client = self
            .clients
            .get(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        let number = select_account(&client, number)?;

        let account = self
            .accounts
            .get(&number)
            .ok_or_else(|| LedgerError::account_not_found(tax_id, number))?;

        Ok(Statement::new(account.value(), client.name()))
    }

    pub fn find_client(&self, tax_id: &TaxId) -> Option<Client> {
        self.clients.get(tax_id).map(|client| client.value().clone())
    }

    /// Snapshots of a client's accounts, in creation order
    pub fn client_accounts(&self, tax_id: &TaxId) -> Result<Vec<Account>, LedgerError> {
        let numbers = self
            .clients
            .get(tax_id)
            .map(|client| client.accounts().to_vec())
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        if numbers.is_empty() {
            return Err(LedgerError::no_accounts(tax_id));
        }

        Ok(numbers
            .iter()
            .filter_map(|number| self.accounts.get(number).map(|a| a.value().clone()))
            .collect())
    }

    /// Snapshot of every client, sorted by tax ID
    ///
    /// The map has no registration order to preserve.
    pub fn list_clients(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self
            .clients
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        clients.sort_by(|a, b| a.tax_id().cmp(b.tax_id()));
        clients
    }

    /// Snapshot of every account, sorted by account number
    pub fn list_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.number());
        accounts
    }
}

impl Default for AsyncBank {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

/// Shared references are enough to drive an `AsyncBank`, so the trait is
/// implemented on `&AsyncBank`; tasks holding an `Arc<AsyncBank>` use it
/// through `&*bank`.
impl Ledger for &AsyncBank {
    fn create_client(&mut self, registration: ClientRegistration) -> Result<(), LedgerError> {
        AsyncBank::create_client(*self, registration)
    }

    fn create_account(
        &mut self,
        tax_id: &TaxId,
        number: Option<AccountNumber>,
        kind: Option<AccountKind>,
    ) -> Result<AccountNumber, LedgerError> {
        AsyncBank::create_account(*self, tax_id, number, kind)
    }

    fn deposit(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        AsyncBank::deposit(*self, tax_id, number, amount)
    }

    fn withdraw(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        AsyncBank::withdraw(*self, tax_id, number, amount)
    }

    fn statement(&self, tax_id: &TaxId, number: AccountNumber) -> Result<Statement, LedgerError> {
        AsyncBank::statement(*self, tax_id, number)
    }

    fn find_client(&self, tax_id: &TaxId) -> Option<Client> {
        AsyncBank::find_client(*self, tax_id)
    }

    fn client_accounts(&self, tax_id: &TaxId) -> Result<Vec<Account>, LedgerError> {
        AsyncBank::client_accounts(*self, tax_id)
    }

    fn list_clients(&self) -> Vec<Client> {
        AsyncBank::list_clients(*self)
    }

    fn list_accounts(&self) -> Vec<Account> {
        AsyncBank::list_accounts(*self)
    }
}
