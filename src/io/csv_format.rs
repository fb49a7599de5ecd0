//! CSV format handling for command scripts and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Account output serialization
//!
//! # Script Format
//!
//! ```text
//! command,tax_id,account,amount,name,birth_date,address,kind
//! new_client,111,,,Ana,15-03-1992,"Rua A, 1 - Centro - Recife/PE",
//! new_account,111,1,,,,,checking
//! deposit,111,1,200,,,,
//! withdraw,111,1,50,,,,
//! statement,111,1,,,,,
//! ```
//!
//! Unused trailing columns may be left empty or omitted.

use crate::types::{
    parse_amount, Account, AccountKind, AccountNumber, ClientRegistration, LedgerCommand,
    LedgerError, TaxId,
};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CsvRecord {
    pub command: String,
    pub tax_id: String,
    pub account: Option<String>,
    pub amount: Option<String>,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub kind: Option<String>,
}

/// Non-empty, trimmed value of an optional field
fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn required<'a>(field: &'a Option<String>, name: &str, command: &str) -> Result<&'a str, LedgerError> {
    present(field).ok_or_else(|| {
        LedgerError::parse_error(None, format!("{} command requires '{}'", command, name))
    })
}

fn parse_account_number(value: &str) -> Result<AccountNumber, LedgerError> {
    value
        .parse::<AccountNumber>()
        .map_err(|_| LedgerError::parse_error(None, format!("Invalid account number '{}'", value)))
}

fn parse_kind(value: &str) -> Result<AccountKind, LedgerError> {
    match value.to_lowercase().as_str() {
        "basic" => Ok(AccountKind::Basic),
        "checking" => Ok(AccountKind::Checking),
        _ => Err(LedgerError::parse_error(
            None,
            format!("Invalid account kind '{}'", value),
        )),
    }
}

/// Convert a CsvRecord to a LedgerCommand
///
/// The command name is case-insensitive. Amounts are parsed with at most two
/// decimal places; their sign is left for the ledger to judge.
///
/// # Errors
///
/// - `ParseError` for an unknown command, a missing required field, a bad
///   account number or account kind
/// - `InvalidTaxId` / `InvalidAmount` for malformed values
pub fn convert_csv_record(record: CsvRecord) -> Result<LedgerCommand, LedgerError> {
    let command = record.command.trim().to_lowercase();
    let tax_id = TaxId::parse(&record.tax_id)?;

    match command.as_str() {
        "new_client" => Ok(LedgerCommand::NewClient(ClientRegistration {
            tax_id,
            name: required(&record.name, "name", &command)?.to_string(),
            birth_date: present(&record.birth_date).unwrap_or_default().to_string(),
            address: present(&record.address).unwrap_or_default().to_string(),
        })),
        "new_account" => Ok(LedgerCommand::NewAccount {
            tax_id,
            number: present(&record.account)
                .map(parse_account_number)
                .transpose()?,
            kind: present(&record.kind).map(parse_kind).transpose()?,
        }),
        "deposit" | "withdraw" => {
            let number = parse_account_number(required(&record.account, "account", &command)?)?;
            let amount = parse_amount(required(&record.amount, "amount", &command)?, &command)?;

            if command == "deposit" {
                Ok(LedgerCommand::Deposit {
                    tax_id,
                    number,
                    amount,
                })
            } else {
                Ok(LedgerCommand::Withdraw {
                    tax_id,
                    number,
                    amount,
                })
            }
        }
        "statement" => Ok(LedgerCommand::Statement {
            tax_id,
            number: parse_account_number(required(&record.account, "account", &command)?)?,
        }),
        _ => Err(LedgerError::parse_error(
            None,
            format!("Unknown command '{}'", record.command),
        )),
    }
}

/// Write account states to CSV format
///
/// Columns: branch, account, tax_id, kind, balance, withdrawals. Accounts are
/// sorted by number; balances carry two decimals.
///
/// # Errors
///
/// Returns `IoError` if writing fails.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["branch", "account", "tax_id", "kind", "balance", "withdrawals"])?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by_key(|account| account.number());

    for account in sorted_accounts {
        writer.write_record(&[
            account.branch().to_string(),
            account.number().to_string(),
            account.owner().to_string(),
            account.policy().kind().to_string(),
            format!("{:.2}", account.balance()),
            account.history().withdrawal_count().to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountPolicy;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn record(command: &str, tax_id: &str) -> CsvRecord {
        CsvRecord {
            command: command.to_string(),
            tax_id: tax_id.to_string(),
            ..CsvRecord::default()
        }
    }

    #[test]
    fn test_convert_new_client() {
        let csv_record = CsvRecord {
            name: Some("Ana".to_string()),
            birth_date: Some("15-03-1992".to_string()),
            address: Some("Rua A, 1".to_string()),
            ..record("new_client", "111")
        };

        let command = convert_csv_record(csv_record).unwrap();

        assert_eq!(
            command,
            LedgerCommand::NewClient(ClientRegistration {
                tax_id: TaxId::parse("111").unwrap(),
                name: "Ana".to_string(),
                birth_date: "15-03-1992".to_string(),
                address: "Rua A, 1".to_string(),
            })
        );
    }

    #[rstest]
    #[case::defaults(None, None, None, None)]
    #[case::explicit(Some("7"), Some("Basic"), Some(7), Some(AccountKind::Basic))]
    #[case::blank_fields(Some(" "), Some(""), None, None)]
    fn test_convert_new_account(
        #[case] account: Option<&str>,
        #[case] kind: Option<&str>,
        #[case] expected_number: Option<u32>,
        #[case] expected_kind: Option<AccountKind>,
    ) {
        let csv_record = CsvRecord {
            account: account.map(str::to_string),
            kind: kind.map(str::to_string),
            ..record("NEW_ACCOUNT", "111")
        };

        assert_eq!(
            convert_csv_record(csv_record).unwrap(),
            LedgerCommand::NewAccount {
                tax_id: TaxId::parse("111").unwrap(),
                number: expected_number,
                kind: expected_kind,
            }
        );
    }

    #[rstest]
    #[case::deposit("deposit")]
    #[case::withdraw("Withdraw")]
    fn test_convert_transactions(#[case] command: &str) {
        let csv_record = CsvRecord {
            account: Some("1".to_string()),
            amount: Some("10.50".to_string()),
            ..record(command, "111")
        };

        let converted = convert_csv_record(csv_record).unwrap();

        let (number, amount) = match converted {
            LedgerCommand::Deposit { number, amount, .. }
            | LedgerCommand::Withdraw { number, amount, .. } => (number, amount),
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(number, 1);
        assert_eq!(amount, Decimal::new(1050, 2));
    }

    #[rstest]
    #[case::unknown_command(record("transfer", "111"))]
    #[case::missing_name(record("new_client", "111"))]
    #[case::missing_account(CsvRecord { amount: Some("1".into()), ..record("deposit", "111") })]
    #[case::missing_amount(CsvRecord { account: Some("1".into()), ..record("withdraw", "111") })]
    #[case::bad_account(CsvRecord { account: Some("one".into()), ..record("statement", "111") })]
    #[case::bad_kind(CsvRecord { kind: Some("savings".into()), ..record("new_account", "111") })]
    fn test_convert_parse_errors(#[case] csv_record: CsvRecord) {
        assert!(matches!(
            convert_csv_record(csv_record),
            Err(LedgerError::ParseError { .. })
        ));
    }

    #[test]
    fn test_convert_invalid_tax_id() {
        assert!(matches!(
            convert_csv_record(record("statement", "12a")),
            Err(LedgerError::InvalidTaxId { .. })
        ));
    }

    #[test]
    fn test_convert_too_precise_amount() {
        let csv_record = CsvRecord {
            account: Some("1".to_string()),
            amount: Some("1.001".to_string()),
            ..record("deposit", "111")
        };

        assert!(matches!(
            convert_csv_record(csv_record),
            Err(LedgerError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_write_accounts_csv_sorted() {
        let owner = TaxId::parse("111").unwrap();
        let mut checking = Account::new(owner.clone(), 2, AccountPolicy::checking());
        checking.deposit(Decimal::new(15050, 2)).unwrap();
        let basic = Account::new(owner, 1, AccountPolicy::Basic);

        let mut output = Vec::new();
        write_accounts_csv(&[checking, basic], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "branch,account,tax_id,kind,balance,withdrawals\n\
             101,1,111,basic,0.00,0\n\
             101,2,111,checking,150.50,0\n"
        );
    }
}
