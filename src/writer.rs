use std::io::Write;

use serde::Serialize;

use crate::domain::types::{AccountKey, Amount, CardNumber};
use crate::domain::Account;

/// Writes a ledger export: the owner header, then one line per entry.
pub fn write_ledger<W: Write, S: AsRef<str>>(
    writer: &mut W,
    owner_name: &str,
    lines: &[S],
) -> std::io::Result<()> {
    writeln!(writer, "{}'s Ledger", owner_name)?;
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    Ok(())
}

/// Summary row for one account. The pin is never written out.
#[derive(Debug, Serialize)]
pub struct OutputRecord {
    pub card: CardNumber,
    pub owner: String,
    pub balance: Amount,
    pub transactions: usize,
}

impl OutputRecord {
    pub fn from_account(key: AccountKey, account: &Account, transactions: usize) -> Self {
        OutputRecord {
            card: key.card,
            owner: account.owner_name.clone(),
            balance: account.balance,
            transactions,
        }
    }
}

/// Writes one summary row per account, cards zero-padded as in [`CardNumber`]'s `Display`.
pub fn write_csv<W: Write>(
    writer: W,
    records: impl Iterator<Item = OutputRecord>,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(["card", "owner", "balance", "transactions"])?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
