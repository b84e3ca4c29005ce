use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::domain::account::Account;
use crate::domain::types::{AccountKey, Amount, OperationType};
use crate::error::Error;
use crate::parser::InputRecord;
use crate::writer::write_ledger;

/// Owns every account and its transaction log.
///
/// Both tables are keyed by the same set of [`AccountKey`]s at all times:
/// registration inserts into both, nothing removes from either.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: BTreeMap<AccountKey, Account>,
    transactions: BTreeMap<AccountKey, Vec<String>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        AccountRegistry {
            accounts: BTreeMap::new(),
            transactions: BTreeMap::new(),
        }
    }

    pub fn accounts(&self) -> &BTreeMap<AccountKey, Account> {
        &self.accounts
    }

    pub fn transactions(&self) -> &BTreeMap<AccountKey, Vec<String>> {
        &self.transactions
    }

    pub fn account(&self, key: AccountKey) -> Option<&Account> {
        self.accounts.get(&key)
    }

    pub fn transaction_log(&self, key: AccountKey) -> Option<&[String]> {
        self.transactions.get(&key).map(Vec::as_slice)
    }

    pub fn register_account(
        &mut self,
        card: u32,
        pin: u16,
        owner_name: impl Into<String>,
        initial_balance: Amount,
    ) -> Result<(), Error> {
        let key = AccountKey::new(card, pin);
        if self.accounts.contains_key(&key) {
            return Err(Error::AlreadyExists(key));
        }
        if initial_balance.is_negative() {
            return Err(Error::InvalidArgument(initial_balance));
        }

        self.accounts
            .insert(key, Account::new(owner_name, initial_balance));
        self.transactions.insert(key, Vec::new());
        debug!(card = %key.card, balance = %initial_balance, "account registered");
        Ok(())
    }

    pub fn deposit_cash(&mut self, card: u32, pin: u16, amount: Amount) -> Result<(), Error> {
        let key = AccountKey::new(card, pin);
        let account = self.accounts.get_mut(&key).ok_or(Error::NotFound(key))?;
        let balance = account.deposit(amount)?;

        self.push_line(
            key,
            format!("Deposit - Amount: ${amount}, Updated Balance: ${balance}"),
        );
        debug!(card = %key.card, %amount, %balance, "deposit accepted");
        Ok(())
    }

    pub fn withdraw_cash(&mut self, card: u32, pin: u16, amount: Amount) -> Result<(), Error> {
        let key = AccountKey::new(card, pin);
        let account = self.accounts.get_mut(&key).ok_or(Error::NotFound(key))?;
        let balance = account.withdraw(amount)?;

        self.push_line(
            key,
            format!("Withdrawal - Amount: ${amount}, Updated Balance: ${balance}"),
        );
        debug!(card = %key.card, %amount, %balance, "withdrawal accepted");
        Ok(())
    }

    /// Appends a raw line to an account's log without touching its balance.
    /// Used to seed history recorded elsewhere.
    pub fn append_ledger_line(
        &mut self,
        card: u32,
        pin: u16,
        line: impl Into<String>,
    ) -> Result<(), Error> {
        let key = AccountKey::new(card, pin);
        if !self.accounts.contains_key(&key) {
            return Err(Error::NotFound(key));
        }
        self.push_line(key, line.into());
        Ok(())
    }

    /// Writes the owner header followed by every ledger line.
    pub fn write_ledger<W: Write>(&self, writer: &mut W, card: u32, pin: u16) -> Result<(), Error> {
        let key = AccountKey::new(card, pin);
        let account = self.accounts.get(&key).ok_or(Error::NotFound(key))?;
        let lines = self.transaction_log(key).unwrap_or_default();
        write_ledger(writer, &account.owner_name, lines)?;
        Ok(())
    }

    /// Exports an account's ledger to `path`, creating or truncating it.
    /// Nothing is created for an unknown account.
    pub fn print_ledger(&self, path: impl AsRef<Path>, card: u32, pin: u16) -> Result<(), Error> {
        let path = path.as_ref();
        let key = AccountKey::new(card, pin);
        if !self.accounts.contains_key(&key) {
            return Err(Error::NotFound(key));
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ledger(&mut writer, card, pin)?;
        writer.flush()?;
        debug!(card = %key.card, path = %path.display(), "ledger exported");
        Ok(())
    }

    /// Routes a parsed operation to the matching registry call.
    pub fn apply(&mut self, record: InputRecord) -> Result<(), Error> {
        let InputRecord {
            op,
            line: _,
            key,
            name,
            amount,
        } = record;
        let (card, pin) = (key.card.0, key.pin.0);
        match op {
            OperationType::Register => {
                self.register_account(card, pin, name.unwrap_or_default(), amount)
            }
            OperationType::Deposit => self.deposit_cash(card, pin, amount),
            OperationType::Withdraw => self.withdraw_cash(card, pin, amount),
        }
    }

    fn push_line(&mut self, key: AccountKey, line: String) {
        self.transactions.entry(key).or_default().push(line);
    }
}
