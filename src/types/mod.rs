//! Types module
//!
//! Contains the ledger's data model.
//! This module organizes types into logical submodules:
//! - `account`: accounts and their withdrawal policies
//! - `amount`: parsing of currency amounts
//! - `client`: clients and tax IDs
//! - `command`: parsed ledger commands, their outcomes and statements
//! - `error`: error types for the ledger
//! - `history`: per-account transaction history
//! - `transaction`: deposits and withdrawals

pub mod account;
pub mod amount;
pub mod client;
pub mod command;
pub mod error;
pub mod history;
pub mod transaction;

pub use account::{Account, AccountKind, AccountNumber, AccountPolicy, BRANCH_CODE};
pub use amount::parse_amount;
pub use client::{Client, ClientKind, ClientRegistration, TaxId};
pub use command::{CommandOutcome, LedgerCommand, Statement};
pub use error::{ErrorCategory, LedgerError};
pub use history::{History, HistoryEntry};
pub use transaction::{Transaction, TransactionKind};
