//! Client types for the bank ledger
//!
//! A client owns an address and the ordered list of its account numbers. The
//! only kind of client today is an individual, identified by a tax ID.

use super::account::{Account, AccountNumber};
use super::error::LedgerError;
use super::transaction::Transaction;
use std::fmt;

/// Unique identifier of an individual client
///
/// Only ASCII digits are accepted; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxId(String);

impl TaxId {
    /// Parse and validate a tax ID
    ///
    /// # Errors
    ///
    /// Returns `InvalidTaxId` if the value is empty or contains non-digits.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(LedgerError::InvalidTaxId {
                value: value.to_string(),
            });
        }
        Ok(TaxId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of client, with the data specific to that kind
#[derive(Debug, Clone, PartialEq)]
pub enum ClientKind {
    /// A natural person
    Individual {
        tax_id: TaxId,
        name: String,
        /// Birth date as entered (dd-mm-yyyy)
        birth_date: String,
    },
}

/// Everything needed to register a new individual client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRegistration {
    pub tax_id: TaxId,
    pub name: String,
    pub birth_date: String,
    pub address: String,
}

/// A bank client
///
/// Holds the numbers of the accounts it owns, in creation order. The accounts
/// themselves live in the registry's account book.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    kind: ClientKind,
    address: String,
    accounts: Vec<AccountNumber>,
}

impl Client {
    /// Create an individual client with no accounts
    pub fn individual(registration: ClientRegistration) -> Self {
        Client {
            kind: ClientKind::Individual {
                tax_id: registration.tax_id,
                name: registration.name,
                birth_date: registration.birth_date,
            },
            address: registration.address,
            accounts: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ClientKind {
        &self.kind
    }

    pub fn tax_id(&self) -> &TaxId {
        match &self.kind {
            ClientKind::Individual { tax_id, .. } => tax_id,
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            ClientKind::Individual { name, .. } => name,
        }
    }

    pub fn birth_date(&self) -> &str {
        match &self.kind {
            ClientKind::Individual { birth_date, .. } => birth_date,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Numbers of the accounts this client owns, in creation order
    pub fn accounts(&self) -> &[AccountNumber] {
        &self.accounts
    }

    pub fn owns(&self, number: AccountNumber) -> bool {
        self.accounts.contains(&number)
    }

    /// Append an account to the owned list
    ///
    /// Uniqueness of account numbers is guaranteed by the account book.
    pub fn add_account(&mut self, number: AccountNumber) {
        self.accounts.push(number);
    }

    /// Apply a transaction to one of this client's accounts
    ///
    /// The client performs no amount validation of its own; that is the
    /// transaction's job. It does refuse to touch accounts it doesn't own.
    ///
    /// # Errors
    ///
    /// - `AccountNotOwned` if the account's owner is a different client
    /// - any error produced by [`Transaction::apply`]
    pub fn perform_transaction(
        &self,
        account: &mut Account,
        transaction: &Transaction,
    ) -> Result<(), LedgerError> {
        if account.owner() != self.tax_id() {
            return Err(LedgerError::account_not_owned(
                self.tax_id(),
                account.number(),
            ));
        }

        transaction.apply(account)
    }
}
