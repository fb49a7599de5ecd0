//! Transaction types for the bank ledger
//!
//! A transaction carries an operation kind and an amount. It is validated only
//! when applied to an account, and recorded in that account's history only if
//! the application succeeds.

use super::account::Account;
use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;

/// Transaction kinds supported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Credit funds to an account
    Deposit,

    /// Debit funds from an account, subject to the account's policy
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("Deposit"),
            TransactionKind::Withdrawal => f.write_str("Withdrawal"),
        }
    }
}

/// A deposit or withdrawal of a fixed amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Deposit(Decimal),
    Withdrawal(Decimal),
}

impl Transaction {
    pub fn deposit(amount: Decimal) -> Self {
        Transaction::Deposit(amount)
    }

    pub fn withdrawal(amount: Decimal) -> Self {
        Transaction::Withdrawal(amount)
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Deposit(_) => TransactionKind::Deposit,
            Transaction::Withdrawal(_) => TransactionKind::Withdrawal,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Transaction::Deposit(amount) | Transaction::Withdrawal(amount) => *amount,
        }
    }

    /// Apply this transaction to `account`
    ///
    /// On success the balance is updated and the transaction is appended to
    /// the account's history. On failure neither is touched.
    ///
    /// # Errors
    ///
    /// Whatever [`Account::deposit`] or [`Account::withdraw`] reports:
    /// `InvalidAmount`, `InsufficientFunds`, `LimitExceeded`,
    /// `WithdrawalCountExceeded` or `ArithmeticOverflow`.
    pub fn apply(&self, account: &mut Account) -> Result<(), LedgerError> {
        match self {
            Transaction::Deposit(amount) => account.deposit(*amount)?,
            Transaction::Withdrawal(amount) => account.withdraw(*amount)?,
        }

        account.history_mut().record(self);

        Ok(())
    }
}
