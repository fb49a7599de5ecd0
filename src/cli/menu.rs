//! Interactive text menu
//!
//! Reads choices and field values line by line from any `BufRead`, writes
//! prompts and reports to any `Write`, and drives any [`Ledger`]. Rejected
//! operations are reported and the menu returns to the top; only I/O failures
//! end the session with an error. End of input ends it cleanly.

use crate::core::Ledger;
use crate::types::{
    parse_amount, AccountKind, AccountNumber, ClientRegistration, LedgerError, TaxId,
    TransactionKind,
};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const MENU: &str = "\n\
================ MENU ================\n\
[d]  Deposit\n\
[s]  Withdraw\n\
[e]  Statement\n\
[nc] New account\n\
[lc] List accounts\n\
[nu] New client\n\
[lu] List clients\n\
[q]  Quit\n\
=> ";

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Deposit,
    Withdraw,
    Statement,
    NewAccount,
    ListAccounts,
    NewClient,
    ListClients,
    Quit,
}

impl MenuOption {
    /// Parse a menu choice, ignoring case and surrounding whitespace
    pub fn parse(choice: &str) -> Option<Self> {
        match choice.trim().to_lowercase().as_str() {
            "d" => Some(MenuOption::Deposit),
            "s" => Some(MenuOption::Withdraw),
            "e" => Some(MenuOption::Statement),
            "nc" => Some(MenuOption::NewAccount),
            "lc" => Some(MenuOption::ListAccounts),
            "nu" => Some(MenuOption::NewClient),
            "lu" => Some(MenuOption::ListClients),
            "q" => Some(MenuOption::Quit),
            _ => None,
        }
    }
}

/// Whether the session may go on after an operation
enum Flow {
    Continue,
    InputClosed,
}

/// Interactive session over a ledger
pub struct Menu<R, W, L> {
    input: R,
    output: W,
    ledger: L,
}

impl<R: BufRead, W: Write, L: Ledger> Menu<R, W, L> {
    pub fn new(input: R, output: W, ledger: L) -> Self {
        Self {
            input,
            output,
            ledger,
        }
    }

    /// Give back the output and the ledger
    pub fn into_parts(self) -> (W, L) {
        (self.output, self.ledger)
    }

    /// Run until the user quits or the input ends
    ///
    /// # Errors
    ///
    /// Returns `IoError` if reading input or writing output fails.
    pub fn run(&mut self) -> Result<(), LedgerError> {
        loop {
            let Some(choice) = self.prompt(MENU)? else {
                return Ok(());
            };

            let option = match MenuOption::parse(&choice) {
                Some(MenuOption::Quit) => return Ok(()),
                Some(option) => option,
                None => {
                    writeln!(self.output, "Invalid option, please try again.")?;
                    continue;
                }
            };

            debug!(?option, "menu option selected");
            match self.dispatch(option) {
                Ok(Flow::Continue) => {}
                Ok(Flow::InputClosed) => return Ok(()),
                Err(e @ LedgerError::IoError { .. }) => return Err(e),
                Err(e) => {
                    warn!(?option, category = ?e.category(), error = %e, "operation rejected");
                    writeln!(self.output, "Operation failed: {}", e)?;
                }
            }
        }
    }

    fn dispatch(&mut self, option: MenuOption) -> Result<Flow, LedgerError> {
        match option {
            MenuOption::Deposit => self.transact(TransactionKind::Deposit),
            MenuOption::Withdraw => self.transact(TransactionKind::Withdrawal),
            MenuOption::Statement => self.show_statement(),
            MenuOption::NewAccount => self.new_account(),
            MenuOption::ListAccounts => self.list_accounts(),
            MenuOption::NewClient => self.new_client(),
            MenuOption::ListClients => self.list_clients(),
            MenuOption::Quit => Ok(Flow::InputClosed),
        }
    }

    /// Write `label`, then read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>, LedgerError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_tax_id(&mut self) -> Result<Option<TaxId>, LedgerError> {
        match self.prompt("Tax ID (digits only): ")? {
            Some(text) => TaxId::parse(&text).map(Some),
            None => Ok(None),
        }
    }

    /// List the client's accounts and read the chosen number
    fn choose_account(&mut self, tax_id: &TaxId) -> Result<Option<AccountNumber>, LedgerError> {
        let accounts = self.ledger.client_accounts(tax_id)?;

        writeln!(self.output, "Accounts:")?;
        for account in &accounts {
            writeln!(
                self.output,
                "  {}-{} ({})",
                account.branch(),
                account.number(),
                account.policy().kind()
            )?;
        }

        let Some(text) = self.prompt("Account number: ")? else {
            return Ok(None);
        };
        text.parse::<AccountNumber>()
            .map(Some)
            .map_err(|_| LedgerError::parse_error(None, format!("Invalid account number '{}'", text)))
    }

    fn transact(&mut self, kind: TransactionKind) -> Result<Flow, LedgerError> {
        let Some(tax_id) = self.ask_tax_id()? else {
            return Ok(Flow::InputClosed);
        };
        let Some(number) = self.choose_account(&tax_id)? else {
            return Ok(Flow::InputClosed);
        };
        let Some(text) = self.prompt(&format!("{} amount: ", kind))? else {
            return Ok(Flow::InputClosed);
        };

        let balance = match kind {
            TransactionKind::Deposit => {
                let amount = parse_amount(&text, "deposit")?;
                self.ledger.deposit(&tax_id, number, amount)?
            }
            TransactionKind::Withdrawal => {
                let amount = parse_amount(&text, "withdrawal")?;
                self.ledger.withdraw(&tax_id, number, amount)?
            }
        };

        writeln!(self.output, "{} completed. Balance: {:.2}", kind, balance)?;
        Ok(Flow::Continue)
    }

    fn show_statement(&mut self) -> Result<Flow, LedgerError> {
        let Some(tax_id) = self.ask_tax_id()? else {
            return Ok(Flow::InputClosed);
        };
        let Some(number) = self.choose_account(&tax_id)? else {
            return Ok(Flow::InputClosed);
        };

        let statement = self.ledger.statement(&tax_id, number)?;

        writeln!(self.output, "\n============== STATEMENT ==============")?;
        writeln!(
            self.output,
            "Branch: {}  Account: {}  Holder: {}",
            statement.branch, statement.number, statement.holder
        )?;
        if statement.entries.is_empty() {
            writeln!(self.output, "No transactions recorded.")?;
        }
        for entry in &statement.entries {
            writeln!(
                self.output,
                "{}  {}: {:.2}",
                entry.formatted_timestamp(),
                entry.kind,
                entry.amount
            )?;
        }
        writeln!(self.output, "Balance: {:.2}", statement.balance)?;
        writeln!(self.output, "=======================================")?;

        Ok(Flow::Continue)
    }

    fn new_client(&mut self) -> Result<Flow, LedgerError> {
        let Some(tax_id) = self.ask_tax_id()? else {
            return Ok(Flow::InputClosed);
        };
        let Some(name) = self.prompt("Full name: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(birth_date) = self.prompt("Birth date (dd-mm-yyyy): ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(address) = self.prompt("Address (street, number - district - city/state): ")?
        else {
            return Ok(Flow::InputClosed);
        };

        self.ledger.create_client(ClientRegistration {
            tax_id,
            name,
            birth_date,
            address,
        })?;

        writeln!(self.output, "Client created.")?;
        Ok(Flow::Continue)
    }

    fn new_account(&mut self) -> Result<Flow, LedgerError> {
        let Some(tax_id) = self.ask_tax_id()? else {
            return Ok(Flow::InputClosed);
        };
        let Some(text) = self.prompt("Account kind (checking/basic, blank for default): ")? else {
            return Ok(Flow::InputClosed);
        };

        let kind = match text.to_lowercase().as_str() {
            "" => None,
            "checking" => Some(AccountKind::Checking),
            "basic" => Some(AccountKind::Basic),
            _ => {
                return Err(LedgerError::parse_error(
                    None,
                    format!("Invalid account kind '{}'", text),
                ))
            }
        };

        let number = self.ledger.create_account(&tax_id, None, kind)?;

        writeln!(self.output, "Account {} opened.", number)?;
        Ok(Flow::Continue)
    }

    fn list_accounts(&mut self) -> Result<Flow, LedgerError> {
        let accounts = self.ledger.list_accounts();
        if accounts.is_empty() {
            writeln!(self.output, "No accounts.")?;
        }

        for account in accounts {
            let holder = self
                .ledger
                .find_client(account.owner())
                .map(|client| client.name().to_string())
                .unwrap_or_default();

            writeln!(self.output, "=======================================")?;
            writeln!(self.output, "Branch:  {}", account.branch())?;
            writeln!(self.output, "Account: {}", account.number())?;
            writeln!(self.output, "Kind:    {}", account.policy().kind())?;
            writeln!(self.output, "Holder:  {}", holder)?;
            writeln!(self.output, "Balance: {:.2}", account.balance())?;
        }

        Ok(Flow::Continue)
    }

    fn list_clients(&mut self) -> Result<Flow, LedgerError> {
        let clients = self.ledger.list_clients();
        if clients.is_empty() {
            writeln!(self.output, "No clients.")?;
        }

        for client in clients {
            writeln!(self.output, "=======================================")?;
            writeln!(self.output, "Tax ID:     {}", client.tax_id())?;
            writeln!(self.output, "Name:       {}", client.name())?;
            writeln!(self.output, "Birth date: {}", client.birth_date())?;
            writeln!(self.output, "Address:    {}", client.address())?;
            writeln!(self.output, "Accounts:   {}", client.accounts().len())?;
        }

        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bank;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::io::Cursor;

    fn run_session(script: &str) -> (String, Bank) {
        let mut menu = Menu::new(Cursor::new(script.as_bytes()), Vec::new(), Bank::default());
        menu.run().unwrap();
        let (output, bank) = menu.into_parts();
        (String::from_utf8(output).unwrap(), bank)
    }

    const REGISTER: &str = "nu\n111\nAna Souza\n15-03-1992\nRua A, 1 - Centro - Recife/PE\nnc\n111\n\n";

    #[rstest]
    #[case::deposit("d", Some(MenuOption::Deposit))]
    #[case::upper_case(" NC ", Some(MenuOption::NewAccount))]
    #[case::quit("q", Some(MenuOption::Quit))]
    #[case::unknown("x", None)]
    fn test_menu_option_parse(#[case] choice: &str, #[case] expected: Option<MenuOption>) {
        assert_eq!(MenuOption::parse(choice), expected);
    }

    #[test]
    fn test_full_session() {
        let script = format!("{}d\n111\n1\n200\ns\n111\n1\n50\ne\n111\n1\nq\n", REGISTER);

        let (output, bank) = run_session(&script);

        assert!(output.contains("Client created."));
        assert!(output.contains("Account 1 opened."));
        assert!(output.contains("Deposit completed. Balance: 200.00"));
        assert!(output.contains("Withdrawal completed. Balance: 150.00"));
        assert!(output.contains("Holder: Ana Souza"));
        assert!(output.contains("Balance: 150.00"));

        let accounts = bank.list_accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance(), Decimal::from(150));
        assert_eq!(accounts[0].history().len(), 2);
    }

    #[test]
    fn test_rejections_return_to_menu() {
        let script = format!(
            "{}s\n111\n1\n1000\nd\n999\nd\n111\n7\n5\nd\n111\n1\n-5\nd\n111\n1\n10\nq\n",
            REGISTER
        );

        let (output, bank) = run_session(&script);

        assert!(output.contains("exceeds the limit of 500"));
        assert!(output.contains("Client 999 not found"));
        assert!(output.contains("Client 111 has no account number 7"));
        assert!(output.contains("Invalid amount '-5' for deposit"));
        assert!(output.contains("Deposit completed. Balance: 10.00"));
        assert_eq!(bank.list_accounts()[0].balance(), Decimal::from(10));
    }

    #[test]
    fn test_empty_statement_and_listings() {
        let script = format!("lu\nlc\n{}e\n111\n1\nlu\nlc\nq\n", REGISTER);

        let (output, _) = run_session(&script);

        assert!(output.contains("No clients."));
        assert!(output.contains("No accounts."));
        assert!(output.contains("No transactions recorded."));
        assert!(output.contains("Name:       Ana Souza"));
        assert!(output.contains("Kind:    checking"));
        assert!(output.contains("Balance: 0.00"));
    }

    #[test]
    fn test_invalid_option_and_input_errors() {
        let script = "x\nd\n12a\nnc\n111\nsavings\nq\n";

        let (output, _) = run_session(script);

        assert!(output.contains("Invalid option, please try again."));
        assert!(output.contains("Invalid tax ID '12a'"));
        assert!(output.contains("Invalid account kind 'savings'"));
    }

    #[test]
    fn test_duplicate_client_is_reported() {
        let script = format!("{}nu\n111\nOther\n01-01-1980\nElsewhere\nq\n", REGISTER);

        let (output, bank) = run_session(&script);

        assert!(output.contains("Client 111 already exists"));
        assert_eq!(bank.list_clients().len(), 1);
        assert_eq!(bank.list_clients()[0].name(), "Ana Souza");
    }

    #[test]
    fn test_end_of_input_mid_operation() {
        let script = format!("{}d\n111\n", REGISTER);

        let (output, bank) = run_session(&script);

        assert!(output.ends_with("Account number: "));
        assert_eq!(bank.list_accounts()[0].balance(), Decimal::ZERO);
    }

    #[test]
    fn test_no_accounts_is_reported() {
        let script = "nu\n222\nBia\n\n\ns\n222\nq\n";

        let (output, _) = run_session(script);

        assert!(output.contains("Client 222 has no accounts"));
    }
}
