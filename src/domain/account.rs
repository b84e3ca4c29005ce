use crate::domain::types::Amount;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub owner_name: String,
    pub balance: Amount,
}

impl Account {
    pub fn new(owner_name: impl Into<String>, balance: Amount) -> Self {
        Account {
            owner_name: owner_name.into(),
            balance,
        }
    }

    /// Credits a strictly positive amount and returns the updated balance.
    /// The balance is untouched on error.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidArgument(amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(Error::BalanceOverflow {
                balance: self.balance,
                requested: amount,
            })?;
        Ok(self.balance)
    }

    /// Debits a strictly positive amount no larger than the balance and
    /// returns the updated balance. The balance is untouched on error.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidArgument(amount));
        }
        if self.balance < amount {
            return Err(Error::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        // balance >= amount > 0, so this cannot leave the Decimal range.
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            })?;
        Ok(self.balance)
    }
}
