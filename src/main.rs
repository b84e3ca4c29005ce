use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use atm_ledger::domain::{AccountKey, AccountRegistry};
use atm_ledger::parser::CsvParser;
use atm_ledger::writer::{write_csv, OutputRecord};

/// Replays ATM operations and prints every account's balance.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file with `type,card,pin,name,amount` columns
    operations: PathBuf,

    /// Export each account's ledger to `<DIR>/<card>-<n>.txt`, where `n`
    /// counts accounts sharing a card in pin order
    #[arg(long, value_name = "DIR")]
    ledger_dir: Option<PathBuf>,
}

/// Names ledger files by card and a per-card ordinal so no pin reaches the
/// filesystem. Keys must arrive sorted, as `BTreeMap` yields them.
fn ledger_file_names(keys: impl Iterator<Item = AccountKey>) -> Vec<(AccountKey, String)> {
    let mut names = Vec::new();
    let mut previous: Option<(AccountKey, usize)> = None;
    for key in keys {
        let ordinal = match previous {
            Some((prev, n)) if prev.card == key.card => n + 1,
            _ => 1,
        };
        names.push((key, format!("{}-{}.txt", key.card, ordinal)));
        previous = Some((key, ordinal));
    }
    names
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let file = File::open(&args.operations)
        .with_context(|| format!("Failed to open '{}'", args.operations.display()))?;
    let parser = CsvParser::new(BufReader::new(file)).map_err(|e| anyhow!(e))?;

    let mut registry = AccountRegistry::new();
    for result in parser {
        match result {
            Ok(record) => {
                let (line, op) = (record.line, record.op);
                if let Err(e) = registry.apply(record) {
                    warn!(line, ?op, error = %e, "operation rejected");
                }
            }
            Err(e) => warn!(line = e.line, "{}", e.message),
        }
    }

    let records = registry.accounts().iter().map(|(key, account)| {
        let transactions = registry.transaction_log(*key).map_or(0, <[String]>::len);
        OutputRecord::from_account(*key, account, transactions)
    });
    write_csv(io::stdout().lock(), records).context("Failed to write output")?;

    if let Some(dir) = args.ledger_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create '{}'", dir.display()))?;
        for (key, file_name) in ledger_file_names(registry.accounts().keys().copied()) {
            let path = dir.join(file_name);
            registry
                .print_ledger(&path, key.card.0, key.pin.0)
                .with_context(|| format!("Failed to export '{}'", path.display()))?;
        }
        info!(count = registry.accounts().len(), dir = %dir.display(), "ledgers exported");
    }

    Ok(())
}
