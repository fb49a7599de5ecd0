//! Client and account registries
//!
//! This module provides the two repositories backing the single-threaded
//! ledger, plus the account-selection rule shared by every ledger:
//!
//! - `ClientDirectory` - registered clients, looked up by tax ID
//! - `AccountBook` - every opened account, numbered in increasing order
//! - `select_account` - resolve one of a client's accounts by number
//!
//! Uniqueness of tax IDs and account numbers is enforced here and nowhere else.

use crate::types::{Account, AccountNumber, AccountPolicy, Client, LedgerError, TaxId};

/// Registered clients, in registration order
#[derive(Debug, Default)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

impl ClientDirectory {
    pub fn new() -> Self {
        ClientDirectory {
            clients: Vec::new(),
        }
    }

    /// Register a client
    ///
    /// # Errors
    ///
    /// Returns `ClientAlreadyExists` if the tax ID is taken; the directory is
    /// left unchanged.
    pub fn register(&mut self, client: Client) -> Result<(), LedgerError> {
        if self.find_by_tax_id(client.tax_id()).is_some() {
            return Err(LedgerError::client_already_exists(client.tax_id()));
        }

        self.clients.push(client);
        Ok(())
    }

    /// Find a client by tax ID
    ///
    /// Linear scan; the first match wins.
    pub fn find_by_tax_id(&self, tax_id: &TaxId) -> Option<&Client> {
        self.clients.iter().find(|client| client.tax_id() == tax_id)
    }

    pub fn find_by_tax_id_mut(&mut self, tax_id: &TaxId) -> Option<&mut Client> {
        self.clients
            .iter_mut()
            .find(|client| client.tax_id() == tax_id)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }
}

/// Every opened account, in opening order
#[derive(Debug)]
pub struct AccountBook {
    accounts: Vec<Account>,
    /// Wider than `AccountNumber` so that "past the last number" fits
    next_number: u64,
}

impl AccountBook {
    pub fn new() -> Self {
        AccountBook {
            accounts: Vec::new(),
            next_number: 1,
        }
    }

    /// Open an account for `owner`
    ///
    /// Without an explicit number the next free one is assigned. An explicit
    /// number moves the counter past it, so later assignments stay increasing.
    ///
    /// # Errors
    ///
    /// - `AccountAlreadyExists` if the number is already in use
    /// - `ArithmeticOverflow` if no number is given and the last possible
    ///   number has been handed out
    pub fn open(
        &mut self,
        owner: &TaxId,
        number: Option<AccountNumber>,
        policy: AccountPolicy,
    ) -> Result<AccountNumber, LedgerError> {
        let number = match number {
            Some(number) => number,
            None => AccountNumber::try_from(self.next_number).map_err(|_| {
                LedgerError::arithmetic_overflow("account numbering", AccountNumber::MAX)
            })?,
        };

        if self.get(number).is_some() {
            return Err(LedgerError::AccountAlreadyExists { number });
        }

        self.accounts
            .push(Account::new(owner.clone(), number, policy));
        self.next_number = self.next_number.max(u64::from(number) + 1);

        Ok(number)
    }

    pub fn get(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.number() == number)
    }

    pub fn get_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.number() == number)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Number the next implicit `open` would assign
    pub fn next_number(&self) -> u64 {
        self.next_number
    }
}

impl Default for AccountBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Select one of `client`'s accounts by number
///
/// # Errors
///
/// - `NoAccounts` if the client owns no account at all
/// - `AccountNotFound` if none of the client's accounts has that number,
///   including numbers that exist but belong to someone else
pub fn select_account(client: &Client, number: AccountNumber) -> Result<AccountNumber, LedgerError> {
    if client.accounts().is_empty() {
        return Err(LedgerError::no_accounts(client.tax_id()));
    }

    client
        .accounts()
        .iter()
        .copied()
        .find(|&owned| owned == number)
        .ok_or_else(|| LedgerError::account_not_found(client.tax_id(), number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientRegistration;

    fn client(tax_id: &str) -> Client {
        Client::individual(ClientRegistration {
            tax_id: TaxId::parse(tax_id).unwrap(),
            name: format!("Client {}", tax_id),
            birth_date: "01-01-1980".to_string(),
            address: "Somewhere".to_string(),
        })
    }

    fn tax_id(value: &str) -> TaxId {
        TaxId::parse(value).unwrap()
    }

    #[test]
    fn test_register_and_find() {
        let mut directory = ClientDirectory::new();
        directory.register(client("111")).unwrap();
        directory.register(client("222")).unwrap();

        assert_eq!(
            directory.find_by_tax_id(&tax_id("222")).unwrap().name(),
            "Client 222"
        );
        assert!(directory.find_by_tax_id(&tax_id("333")).is_none());
        assert_eq!(directory.clients().len(), 2);
    }

    #[test]
    fn test_register_duplicate_leaves_directory_unchanged() {
        let mut directory = ClientDirectory::new();
        directory.register(client("111")).unwrap();

        let mut duplicate = client("111");
        duplicate.add_account(9);
        let result = directory.register(duplicate);

        assert_eq!(
            result,
            Err(LedgerError::ClientAlreadyExists {
                tax_id: tax_id("111")
            })
        );
        assert_eq!(directory.clients().len(), 1);
        assert!(directory.clients()[0].accounts().is_empty());
    }

    #[test]
    fn test_open_assigns_increasing_numbers() {
        let mut book = AccountBook::new();
        let owner = tax_id("111");

        assert_eq!(book.open(&owner, None, AccountPolicy::Basic).unwrap(), 1);
        assert_eq!(book.open(&owner, None, AccountPolicy::Basic).unwrap(), 2);
        assert_eq!(book.next_number(), 3);
    }

    #[test]
    fn test_open_with_explicit_number_moves_counter() {
        let mut book = AccountBook::new();
        let owner = tax_id("111");

        assert_eq!(book.open(&owner, Some(10), AccountPolicy::Basic).unwrap(), 10);
        assert_eq!(book.open(&owner, None, AccountPolicy::Basic).unwrap(), 11);
        assert_eq!(book.open(&owner, Some(4), AccountPolicy::Basic).unwrap(), 4);
        assert_eq!(book.next_number(), 12);
    }

    #[test]
    fn test_open_after_last_number_overflows() {
        let mut book = AccountBook::new();
        let owner = tax_id("111");

        let last = AccountNumber::MAX;
        assert_eq!(book.open(&owner, Some(last - 1), AccountPolicy::Basic).unwrap(), last - 1);
        assert_eq!(book.open(&owner, None, AccountPolicy::Basic).unwrap(), last);

        let result = book.open(&owner, None, AccountPolicy::Basic);

        assert_eq!(
            result,
            Err(LedgerError::arithmetic_overflow("account numbering", last))
        );
        assert_eq!(book.accounts().len(), 2);
        assert_eq!(book.open(&owner, Some(7), AccountPolicy::Basic).unwrap(), 7);
    }

    #[test]
    fn test_open_rejects_taken_number() {
        let mut book = AccountBook::new();
        let owner = tax_id("111");
        book.open(&owner, Some(1), AccountPolicy::Basic).unwrap();

        let result = book.open(&tax_id("222"), Some(1), AccountPolicy::Basic);

        assert_eq!(result, Err(LedgerError::AccountAlreadyExists { number: 1 }));
        assert_eq!(book.accounts().len(), 1);
        assert_eq!(book.get(1).unwrap().owner(), &owner);
    }

    #[test]
    fn test_select_account_without_accounts() {
        let result = select_account(&client("111"), 1);
        assert_eq!(
            result,
            Err(LedgerError::NoAccounts {
                tax_id: tax_id("111")
            })
        );
    }

    #[test]
    fn test_select_account_by_number() {
        let mut owner = client("111");
        owner.add_account(1);
        owner.add_account(4);

        assert_eq!(select_account(&owner, 4), Ok(4));
        assert_eq!(
            select_account(&owner, 2),
            Err(LedgerError::AccountNotFound {
                tax_id: tax_id("111"),
                number: 2
            })
        );
    }
}
