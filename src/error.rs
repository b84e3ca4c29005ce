//! Errors returned by the account registry.
//!
//! Input errors (`NotFound`, `AlreadyExists`, `InvalidArgument`) depend only
//! on what the caller passed in. `InsufficientFunds` depends on the current
//! balance and is kept as its own variant so callers can tell them apart.
//! `BalanceOverflow` means a deposit would leave the representable range.

use thiserror::Error;

use crate::domain::types::{AccountKey, Amount};

#[derive(Error, Debug)]
pub enum Error {
    #[error("account not found: {0}")]
    NotFound(AccountKey),

    #[error("account already exists: {0}")]
    AlreadyExists(AccountKey),

    #[error("invalid amount: ${0}")]
    InvalidArgument(Amount),

    #[error("insufficient funds: balance ${balance}, requested ${requested}")]
    InsufficientFunds { balance: Amount, requested: Amount },

    #[error("balance overflow: balance ${balance}, requested ${requested}")]
    BalanceOverflow { balance: Amount, requested: Amount },

    #[error("failed to write ledger: {0}")]
    Io(#[from] std::io::Error),
}
