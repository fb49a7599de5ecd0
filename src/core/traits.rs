//! Core trait for ledger operations
//!
//! This module defines the operations the outer layers (the interactive menu
//! and the script strategies) call into. Both the single-threaded `Bank` and
//! the concurrent `AsyncBank` implement it.

use crate::types::{
    Account, AccountKind, AccountNumber, Client, ClientRegistration, CommandOutcome,
    LedgerCommand, LedgerError, Statement, TaxId,
};
use rust_decimal::Decimal;

/// Operations offered by a ledger
pub trait Ledger {
    /// Register an individual client
    ///
    /// Fails with `ClientAlreadyExists` on a duplicate tax ID.
    fn create_client(&mut self, registration: ClientRegistration) -> Result<(), LedgerError>;

    /// Open an account for an existing client and return its number
    ///
    /// Fails with `ClientNotFound` if the tax ID is unknown.
    fn create_account(
        &mut self,
        tax_id: &TaxId,
        number: Option<AccountNumber>,
        kind: Option<AccountKind>,
    ) -> Result<AccountNumber, LedgerError>;

    /// Deposit into one of the client's accounts and return the new balance
    fn deposit(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError>;

    /// Withdraw from one of the client's accounts and return the new balance
    fn withdraw(
        &mut self,
        tax_id: &TaxId,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError>;

    /// Statement of one of the client's accounts
    fn statement(&self, tax_id: &TaxId, number: AccountNumber) -> Result<Statement, LedgerError>;

    /// Snapshot of a client
    fn find_client(&self, tax_id: &TaxId) -> Option<Client>;

    /// Snapshots of a client's accounts, in creation order
    ///
    /// Fails with `ClientNotFound` or `NoAccounts`.
    fn client_accounts(&self, tax_id: &TaxId) -> Result<Vec<Account>, LedgerError>;

    /// Snapshot of every client
    fn list_clients(&self) -> Vec<Client>;

    /// Snapshot of every account, sorted by account number
    fn list_accounts(&self) -> Vec<Account>;

    /// Run a parsed command
    fn execute(&mut self, command: LedgerCommand) -> Result<CommandOutcome, LedgerError> {
        match command {
            LedgerCommand::NewClient(registration) => {
                let tax_id = registration.tax_id.clone();
                self.create_client(registration)?;
                Ok(CommandOutcome::ClientCreated(tax_id))
            }
            LedgerCommand::NewAccount {
                tax_id,
                number,
                kind,
            } => self
                .create_account(&tax_id, number, kind)
                .map(CommandOutcome::AccountCreated),
            LedgerCommand::Deposit {
                tax_id,
                number,
                amount,
            } => self
                .deposit(&tax_id, number, amount)
                .map(|balance| CommandOutcome::Applied { number, balance }),
            LedgerCommand::Withdraw {
                tax_id,
                number,
                amount,
            } => self
                .withdraw(&tax_id, number, amount)
                .map(|balance| CommandOutcome::Applied { number, balance }),
            LedgerCommand::Statement { tax_id, number } => self
                .statement(&tax_id, number)
                .map(CommandOutcome::Statement),
        }
    }
}
