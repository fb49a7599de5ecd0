//! Single-threaded ledger
//!
//! This module provides `Bank`, the ledger used by the interactive menu and
//! the synchronous script strategy. It coordinates the `ClientDirectory` and
//! the `AccountBook`:
//!
//! - resolve the client by tax ID
//! - select one of the client's accounts by number
//! - build the transaction and let the client perform it on the account
//!
//! Every check runs before any mutation, so a failed operation leaves the
//! ledger exactly as it was.

use crate::config::LedgerConfig;
use crate::core::directory::{select_account, AccountBook, ClientDirectory};
use crate::core::traits::Ledger;
use crate::types::{
    Account, AccountKind, AccountNumber, Client, ClientRegistration, LedgerError, Statement,
    TaxId, Transaction,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// In-memory, single-threaded ledger
#[derive(Debug, Default)]
pub struct Bank {
    config: LedgerConfig,
    clients: ClientDirectory,
    accounts: AccountBook,
}

impl Bank {
    /// Create an empty Bank using `config` for new accounts
    pub fn new(config: LedgerConfig) -> Self {
        Bank {
            config,
            clients: ClientDirectory::new(),
            accounts: AccountBook::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Resolve client and account, then let the client perform `transaction`
    fn perform(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        transaction: Transaction,
    ) -> Result<Decimal, LedgerError> {
        let client = self
            .clients
            .find_by_tax_id(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        let number = select_account(client, number)?;

        let account = self
            .accounts
            .get_mut(number)
            .ok_or_else(|| LedgerError::account_not_found(tax_id, number))?;

        client.perform_transaction(account, &transaction)?;

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
}

impl Ledger for Bank {
    fn create_client(&mut self, registration: ClientRegistration) -> Result<(), LedgerError> {
        let tax_id = registration.tax_id.clone();
        self.clients.register(Client::individual(registration))?;

        info!(tax_id = %tax_id, "client registered");
        Ok(())
    }

    fn create_account(
        &mut self,
        tax_id: &TaxId,
        number: Option<AccountNumber>,
        kind: Option<AccountKind>,
    ) -> Result<AccountNumber, LedgerError> {
        let client = self
            .clients
            .find_by_tax_id_mut(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        let policy = self.config.policy_for(kind);
        let number = self.accounts.open(tax_id, number, policy)?;
        client.add_account(number);

        info!(tax_id = %tax_id, account = number, kind = %policy.kind(), "account opened");
        Ok(number)
    }

    fn deposit(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.perform(tax_id, number, Transaction::deposit(amount))
    }

    fn withdraw(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.perform(tax_id, number, Transaction::withdrawal(amount))
    }

    fn statement(&self, tax_id: &TaxId, number: AccountNumber) -> Result<Statement, LedgerError> {
        let client = self
            .clients
            .find_by_tax_id(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        let number = select_account(client, number)?;

        let account = self
            .accounts
            .get(number)
            .ok_or_else(|| LedgerError::account_not_found(tax_id, number))?;

        Ok(Statement::new(account, client.name()))
    }

    fn find_client(&self, tax_id: &TaxId) -> Option<Client> {
        self.clients.find_by_tax_id(tax_id).cloned()
    }

    fn client_accounts(&self, tax_id: &TaxId) -> Result<Vec<Account>, LedgerError> {
        let client = self
            .clients
            .find_by_tax_id(tax_id)
            .ok_or_else(|| LedgerError::client_not_found(tax_id))?;

        if client.accounts().is_empty() {
            return Err(LedgerError::no_accounts(tax_id));
        }

        Ok(client
            .accounts()
            .iter()
            .filter_map(|&number| self.accounts.get(number))
            .cloned()
            .collect())
    }

    fn list_clients(&self) -> Vec<Client> {
        self.clients.clients().to_vec()
    }

    fn list_accounts(&self) -> Vec<Account> {
        let mut accounts = self.accounts.accounts().to_vec();
        accounts.sort_by_key(|account| account.number());
        accounts
    }
}
