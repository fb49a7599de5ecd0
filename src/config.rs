//! Ledger configuration
//!
//! Holds the account defaults the ledger applies when opening accounts: the
//! default account kind and the checking-account limits.

use crate::types::account::{DEFAULT_CHECKING_LIMIT, DEFAULT_MAX_WITHDRAWALS};
use crate::types::{AccountKind, AccountPolicy};
use rust_decimal::Decimal;
use tracing::warn;

/// Account defaults used by the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Kind of account opened when none is requested
    pub default_kind: AccountKind,
    /// Per-withdrawal limit of new checking accounts
    pub checking_limit: Decimal,
    /// Withdrawal cap of new checking accounts
    pub max_withdrawals: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_kind: AccountKind::Checking,
            checking_limit: Decimal::from(DEFAULT_CHECKING_LIMIT),
            max_withdrawals: DEFAULT_MAX_WITHDRAWALS,
        }
    }
}

impl LedgerConfig {
    /// Create a LedgerConfig with custom values
    ///
    /// A non-positive limit or a zero cap falls back to the default, with a
    /// warning.
    pub fn new(default_kind: AccountKind, checking_limit: Decimal, max_withdrawals: u32) -> Self {
        let default = Self::default();

        let checking_limit = if checking_limit <= Decimal::ZERO {
            warn!(
                checking_limit = %checking_limit,
                fallback = %default.checking_limit,
                "invalid checking limit, using default"
            );
            default.checking_limit
        } else {
            checking_limit
        };

        let max_withdrawals = if max_withdrawals == 0 {
            warn!(
                fallback = default.max_withdrawals,
                "invalid max withdrawals (0), using default"
            );
            default.max_withdrawals
        } else {
            max_withdrawals
        };

        Self {
            default_kind,
            checking_limit,
            max_withdrawals,
        }
    }

    /// Policy for a new account of `kind`, or of the default kind
    pub fn policy_for(&self, kind: Option<AccountKind>) -> AccountPolicy {
        match kind.unwrap_or(self.default_kind) {
            AccountKind::Basic => AccountPolicy::Basic,
            AccountKind::Checking => AccountPolicy::Checking {
                limit: self.checking_limit,
                max_withdrawals: self.max_withdrawals,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();

        assert_eq!(config.default_kind, AccountKind::Checking);
        assert_eq!(config.policy_for(None), AccountPolicy::checking());
    }

    #[rstest]
    #[case::explicit_basic(Some(AccountKind::Basic), AccountPolicy::Basic)]
    #[case::explicit_checking(Some(AccountKind::Checking), AccountPolicy::checking())]
    #[case::default_kind(None, AccountPolicy::checking())]
    fn test_policy_for(#[case] kind: Option<AccountKind>, #[case] expected: AccountPolicy) {
        assert_eq!(LedgerConfig::default().policy_for(kind), expected);
    }

    #[test]
    fn test_custom_values_are_kept() {
        let config = LedgerConfig::new(AccountKind::Basic, Decimal::from(250), 5);

        assert_eq!(config.policy_for(None), AccountPolicy::Basic);
        assert_eq!(
            config.policy_for(Some(AccountKind::Checking)),
            AccountPolicy::Checking {
                limit: Decimal::from(250),
                max_withdrawals: 5,
            }
        );
    }

    #[rstest]
    #[case::zero_limit(Decimal::ZERO, 3)]
    #[case::negative_limit(Decimal::from(-1), 3)]
    #[case::zero_cap(Decimal::from(500), 0)]
    fn test_invalid_values_fall_back(#[case] limit: Decimal, #[case] max: u32) {
        let config = LedgerConfig::new(AccountKind::Checking, limit, max);

        assert_eq!(config.policy_for(None), AccountPolicy::checking());
    }
}
