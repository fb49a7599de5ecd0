//! Ledger commands and their outcomes
//!
//! A [`LedgerCommand`] is one request to the ledger, as produced by the script
//! readers; a [`CommandOutcome`] is what a successful command yields.

use super::account::{Account, AccountKind, AccountNumber};
use super::client::{ClientRegistration, TaxId};
use super::history::HistoryEntry;
use rust_decimal::Decimal;

/// One request to the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Register an individual client
    NewClient(ClientRegistration),

    /// Open an account for an existing client
    ///
    /// `number` and `kind` fall back to the next free number and the
    /// configured default kind.
    NewAccount {
        tax_id: TaxId,
        number: Option<AccountNumber>,
        kind: Option<AccountKind>,
    },

    Deposit {
        tax_id: TaxId,
        number: AccountNumber,
        amount: Decimal,
    },

    Withdraw {
        tax_id: TaxId,
        number: AccountNumber,
        amount: Decimal,
    },

    Statement {
        tax_id: TaxId,
        number: AccountNumber,
    },
}

impl LedgerCommand {
    /// Tax ID of the client the command acts for
    pub fn tax_id(&self) -> &TaxId {
        match self {
            LedgerCommand::NewClient(registration) => &registration.tax_id,
            LedgerCommand::NewAccount { tax_id, .. }
            | LedgerCommand::Deposit { tax_id, .. }
            | LedgerCommand::Withdraw { tax_id, .. }
            | LedgerCommand::Statement { tax_id, .. } => tax_id,
        }
    }

    /// Whether the command registers a client or opens an account
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            LedgerCommand::NewClient(_) | LedgerCommand::NewAccount { .. }
        )
    }
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    ClientCreated(TaxId),
    AccountCreated(AccountNumber),
    /// Deposit or withdrawal applied; carries the new balance
    Applied {
        number: AccountNumber,
        balance: Decimal,
    },
    Statement(Statement),
}

/// Chronological listing of an account's transactions plus its balance
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub branch: &'static str,
    pub number: AccountNumber,
    pub holder: String,
    pub entries: Vec<HistoryEntry>,
    pub balance: Decimal,
}

impl Statement {
    /// Build a statement from an account and its holder's name
    pub fn new(account: &Account, holder: &str) -> Self {
        Statement {
            branch: account.branch(),
            number: account.number(),
            holder: holder.to_string(),
            entries: account.history().entries().to_vec(),
            balance: account.balance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_registration() {
        let tax_id = TaxId::parse("111").unwrap();
        let registration = ClientRegistration {
            tax_id: tax_id.clone(),
            name: "Ana".to_string(),
            birth_date: "01-01-1990".to_string(),
            address: "Rua A".to_string(),
        };

        assert!(LedgerCommand::NewClient(registration).is_registration());
        assert!(LedgerCommand::NewAccount {
            tax_id: tax_id.clone(),
            number: None,
            kind: None,
        }
        .is_registration());
        assert!(!LedgerCommand::Deposit {
            tax_id: tax_id.clone(),
            number: 1,
            amount: Decimal::ONE,
        }
        .is_registration());
        assert!(!LedgerCommand::Statement { tax_id, number: 1 }.is_registration());
    }
}
