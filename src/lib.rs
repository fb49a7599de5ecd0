//! Rust Bank Ledger Library
//! # Overview
//!
//! An in-memory banking ledger: clients, their accounts and per-account
//! transaction history, with checking-account limits. It is driven either by
//! an interactive menu or by CSV command scripts run through a sync or an
//! async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Data model (Client, Account, Transaction, History, errors)
//! - [`config`] - Account defaults (`LedgerConfig`)
//! - [`core`] - Ledger logic:
//!   - [`core::directory`] - Client registry, account book and account selection
//!   - [`core::engine`] - Single-threaded `Bank`
//!   - [`core::r#async`] - Concurrent `AsyncBank` and the `BatchProcessor`
//!   - [`core::traits`] - The `Ledger` trait both banks implement
//! - [`io`] - CSV command scripts and account output
//! - [`strategy`] - Script processing pipelines
//! - [`cli`] - CLI arguments and the interactive menu
//!
//! # Accounts
//!
//! - **Basic**: withdrawals are limited by the balance only
//! - **Checking**: each withdrawal is also capped by a limit (default 500),
//!   and only a fixed number of withdrawals is accepted (default 3)
//!
//! Balances never go negative, and a rejected operation changes nothing.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::LedgerConfig;
pub use self::core::{AsyncBank, Bank, Ledger};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountKind, AccountNumber, AccountPolicy, Client, LedgerError, TaxId, Transaction,
    TransactionKind,
};
