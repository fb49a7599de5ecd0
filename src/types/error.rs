//! Error types for the bank ledger
//!
//! This module defines every error the ledger can report. None of them are
//! fatal to the ledger itself: each validation runs before any mutation, so a
//! failed operation leaves clients, accounts and histories untouched and the
//! caller simply reports the reason and carries on.
//!
//! # Error Categories
//!
//! - **Lookup errors**: unknown client, no accounts, unknown or foreign account
//! - **Registration errors**: duplicate tax ID or account number
//! - **Transaction errors**: invalid amount, insufficient funds, checking limits
//! - **Input errors**: malformed script rows, unreadable files

use super::account::AccountNumber;
use super::client::TaxId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No client is registered under the tax ID
    #[error("Client {tax_id} not found")]
    ClientNotFound { tax_id: TaxId },

    /// The client exists but owns no accounts yet
    #[error("Client {tax_id} has no accounts")]
    NoAccounts { tax_id: TaxId },

    /// The client owns accounts, but none with the requested number
    #[error("Client {tax_id} has no account number {number}")]
    AccountNotFound { tax_id: TaxId, number: AccountNumber },

    /// A transaction was routed to an account owned by someone else
    #[error("Account {number} does not belong to client {tax_id}")]
    AccountNotOwned { tax_id: TaxId, number: AccountNumber },

    /// A client with this tax ID is already registered
    ///
    /// The registry is left unchanged.
    #[error("Client {tax_id} already exists")]
    ClientAlreadyExists { tax_id: TaxId },

    /// An explicitly requested account number is already taken
    #[error("Account {number} already exists")]
    AccountAlreadyExists { number: AccountNumber },

    /// Non-positive deposit, negative withdrawal or unparseable amount
    #[error("Invalid amount '{amount}' for {operation}")]
    InvalidAmount { amount: String, operation: String },

    /// Withdrawal exceeds the current balance
    #[error("Insufficient funds in account {number}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        number: AccountNumber,
        balance: Decimal,
        requested: Decimal,
    },

    /// Checking account: withdrawal exceeds the per-withdrawal limit
    #[error("Withdrawal of {requested} from account {number} exceeds the limit of {limit}")]
    LimitExceeded {
        number: AccountNumber,
        limit: Decimal,
        requested: Decimal,
    },

    /// Checking account: the withdrawal cap has been reached
    #[error("Account {number} reached the maximum of {max} withdrawals")]
    WithdrawalCountExceeded { number: AccountNumber, max: u32 },

    /// Balance arithmetic would overflow, or account numbers ran out
    #[error("Arithmetic overflow in {operation} for account {number}")]
    ArithmeticOverflow {
        operation: String,
        number: AccountNumber,
    },

    /// Tax ID is empty or contains something other than digits
    #[error("Invalid tax ID '{value}': only digits are allowed")]
    InvalidTaxId { value: String },

    /// A script row could not be parsed or converted
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Coarse classification of [`LedgerError`]
///
/// Mirrors the taxonomy callers care about when deciding what to tell the
/// user; several variants share a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    AlreadyExists,
    InvalidAmount,
    InsufficientFunds,
    LimitExceeded,
    WithdrawalCountExceeded,
    /// Operation refused for a reason other than the above (ownership, overflow)
    Rejected,
    /// Malformed input or I/O failure
    Input,
}

impl LedgerError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::ClientNotFound { .. }
            | LedgerError::NoAccounts { .. }
            | LedgerError::AccountNotFound { .. } => ErrorCategory::NotFound,
            LedgerError::ClientAlreadyExists { .. } | LedgerError::AccountAlreadyExists { .. } => {
                ErrorCategory::AlreadyExists
            }
            LedgerError::InvalidAmount { .. } => ErrorCategory::InvalidAmount,
            LedgerError::InsufficientFunds { .. } => ErrorCategory::InsufficientFunds,
            LedgerError::LimitExceeded { .. } => ErrorCategory::LimitExceeded,
            LedgerError::WithdrawalCountExceeded { .. } => ErrorCategory::WithdrawalCountExceeded,
            LedgerError::AccountNotOwned { .. } | LedgerError::ArithmeticOverflow { .. } => {
                ErrorCategory::Rejected
            }
            LedgerError::InvalidTaxId { .. }
            | LedgerError::ParseError { .. }
            | LedgerError::IoError { .. } => ErrorCategory::Input,
        }
    }
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        LedgerError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a ClientNotFound error
    pub fn client_not_found(tax_id: &TaxId) -> Self {
        LedgerError::ClientNotFound {
            tax_id: tax_id.clone(),
        }
    }

    /// Create a NoAccounts error
    pub fn no_accounts(tax_id: &TaxId) -> Self {
        LedgerError::NoAccounts {
            tax_id: tax_id.clone(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(tax_id: &TaxId, number: AccountNumber) -> Self {
        LedgerError::AccountNotFound {
            tax_id: tax_id.clone(),
            number,
        }
    }

    /// Create an AccountNotOwned error
    pub fn account_not_owned(tax_id: &TaxId, number: AccountNumber) -> Self {
        LedgerError::AccountNotOwned {
            tax_id: tax_id.clone(),
            number,
        }
    }

    /// Create a ClientAlreadyExists error
    pub fn client_already_exists(tax_id: &TaxId) -> Self {
        LedgerError::ClientAlreadyExists {
            tax_id: tax_id.clone(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl ToString, operation: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(number: AccountNumber, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            number,
            balance,
            requested,
        }
    }

    /// Create a LimitExceeded error
    pub fn limit_exceeded(number: AccountNumber, limit: Decimal, requested: Decimal) -> Self {
        LedgerError::LimitExceeded {
            number,
            limit,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, number: AccountNumber) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            number,
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }
}
