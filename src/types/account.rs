//! Account-related types for the bank ledger
//!
//! This module defines the Account structure and its withdrawal policies.
//! Accounts keep their balance and the history of successfully applied
//! transactions; the history itself is appended by [`Transaction::apply`].
//!
//! [`Transaction::apply`]: super::transaction::Transaction::apply

use super::client::TaxId;
use super::error::LedgerError;
use super::history::History;
use rust_decimal::Decimal;
use std::fmt;

/// Account number
///
/// Unique within a registry and assigned in increasing order.
pub type AccountNumber = u32;

/// Branch code shared by every account
pub const BRANCH_CODE: &str = "101";

/// Default per-withdrawal limit of a checking account, in whole currency units
pub const DEFAULT_CHECKING_LIMIT: i64 = 500;

/// Default number of withdrawals a checking account allows
pub const DEFAULT_MAX_WITHDRAWALS: u32 = 3;

/// Withdrawal policy of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountPolicy {
    /// No limit besides the balance itself
    Basic,

    /// Checking account
    ///
    /// Each withdrawal may not exceed `limit`, and at most `max_withdrawals`
    /// withdrawals are accepted over the account's history.
    Checking { limit: Decimal, max_withdrawals: u32 },
}

impl AccountPolicy {
    /// Checking policy with the default limit (500) and cap (3)
    pub fn checking() -> Self {
        AccountPolicy::Checking {
            limit: Decimal::from(DEFAULT_CHECKING_LIMIT),
            max_withdrawals: DEFAULT_MAX_WITHDRAWALS,
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            AccountPolicy::Basic => AccountKind::Basic,
            AccountPolicy::Checking { .. } => AccountKind::Checking,
        }
    }
}

/// Policy discriminant, used where limits are supplied by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AccountKind {
    Basic,
    Checking,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Basic => f.write_str("basic"),
            AccountKind::Checking => f.write_str("checking"),
        }
    }
}

/// A client's account
///
/// The balance is never negative: every withdrawal check runs before the
/// balance is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    number: AccountNumber,
    owner: TaxId,
    balance: Decimal,
    policy: AccountPolicy,
    history: History,
}

impl Account {
    /// Open an account with a zero balance and an empty history
    pub fn new(owner: TaxId, number: AccountNumber, policy: AccountPolicy) -> Self {
        Account {
            number,
            owner,
            balance: Decimal::ZERO,
            policy,
            history: History::new(),
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    /// Tax ID of the owning client
    pub fn owner(&self) -> &TaxId {
        &self.owner
    }

    pub fn branch(&self) -> &'static str {
        BRANCH_CODE
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn policy(&self) -> AccountPolicy {
        self.policy
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Credit the account
    ///
    /// Does not record history; use [`Transaction::apply`] for that.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `ArithmeticOverflow` if the balance would overflow
    ///
    /// [`Transaction::apply`]: super::transaction::Transaction::apply
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount, "deposit"));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", self.number))?;

        Ok(())
    }

    /// Debit the account according to its policy
    ///
    /// For checking accounts the checks run in this order, which decides the
    /// reported reason: per-withdrawal limit, withdrawal count, then the basic
    /// amount and balance checks.
    ///
    /// # Errors
    ///
    /// - `LimitExceeded` (checking) if `amount` is above the limit
    /// - `WithdrawalCountExceeded` (checking) if the cap is reached
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientFunds` if `amount` is above the balance
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if let AccountPolicy::Checking {
            limit,
            max_withdrawals,
        } = self.policy
        {
            let withdrawals = self.history.withdrawal_count();

            if amount > limit {
                return Err(LedgerError::limit_exceeded(self.number, limit, amount));
            }

            if withdrawals >= max_withdrawals as usize {
                return Err(LedgerError::WithdrawalCountExceeded {
                    number: self.number,
                    max: max_withdrawals,
                });
            }
        }

        self.withdraw_from_balance(amount)
    }

    fn withdraw_from_balance(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount, "withdrawal"));
        }

        if amount > self.balance {
            return Err(LedgerError::insufficient_funds(
                self.number,
                self.balance,
                amount,
            ));
        }

        // amount <= balance, cannot go below zero
        self.balance -= amount;

        Ok(())
    }
}
