use csv::ReaderBuilder;
use std::io::Read;

use crate::domain::types::{AccountKey, Amount, OperationType};

#[derive(Debug)]
pub struct InputRecord {
    pub line: usize,
    pub op: OperationType,
    pub key: AccountKey,
    pub name: Option<String>,
    pub amount: Amount,
}

#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
struct ColumnIndices {
    type_idx: usize,
    card_idx: usize,
    pin_idx: usize,
    name_idx: usize,
    amount_idx: usize,
}

/// Streams ATM operations out of a CSV with `type,card,pin,name,amount`
/// headers in any order.
pub struct CsvParser<R: Read> {
    reader: csv::Reader<R>,
    line_number: usize,
    columns: ColumnIndices,
}

impl<R: Read> std::fmt::Debug for CsvParser<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvParser")
            .field("line_number", &self.line_number)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<R: Read> CsvParser<R> {
    pub fn new(reader: R) -> Result<Self, String> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| format!("Failed to read headers: {}", e))?
            .clone();

        let columns = Self::extract_column_indices(&headers)?;

        Ok(CsvParser {
            reader: csv_reader,
            line_number: 1,
            columns,
        })
    }

    fn extract_column_indices(headers: &csv::StringRecord) -> Result<ColumnIndices, String> {
        let find_col = |name: &str| -> Result<usize, String> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| format!("Missing required column: '{}'", name))
        };

        Ok(ColumnIndices {
            type_idx: find_col("type")?,
            card_idx: find_col("card")?,
            pin_idx: find_col("pin")?,
            name_idx: find_col("name")?,
            amount_idx: find_col("amount")?,
        })
    }

    pub fn next_record(&mut self) -> Option<Result<InputRecord, ParseError>> {
        let mut record = csv::StringRecord::new();

        self.line_number += 1;
        let current_line = self.line_number;

        match self.reader.read_record(&mut record) {
            Ok(true) => Some(self.parse_record(&record, current_line)),
            Ok(false) => None,
            Err(e) => Some(Err(ParseError {
                line: current_line,
                message: format!("CSV error: {}", e),
            })),
        }
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        line: usize,
    ) -> Result<InputRecord, ParseError> {
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let op_str = field(self.columns.type_idx);
        let op: OperationType = op_str.parse().map_err(|_| ParseError {
            line,
            message: format!("Unknown operation type: '{}'", op_str),
        })?;

        let card_str = field(self.columns.card_idx);
        let card: u32 = card_str.parse().map_err(|_| ParseError {
            line,
            message: format!("Invalid card number: '{}'", card_str),
        })?;

        let pin_str = field(self.columns.pin_idx);
        let pin: u16 = pin_str.parse().map_err(|_| ParseError {
            line,
            message: format!("Invalid pin: '{}'", pin_str),
        })?;

        let name_str = field(self.columns.name_idx);
        let name = if name_str.is_empty() {
            None
        } else {
            Some(name_str.to_string())
        };
        if op == OperationType::Register && name.is_none() {
            return Err(ParseError {
                line,
                message: "Register requires owner name".to_string(),
            });
        }

        // Sign is left for the registry to judge.
        let amount_str = field(self.columns.amount_idx);
        if amount_str.is_empty() {
            return Err(ParseError {
                line,
                message: "Operation requires amount".to_string(),
            });
        }
        let amount = Amount::from_str_rounded(amount_str).map_err(|_| ParseError {
            line,
            message: format!("Invalid amount: '{}'", amount_str),
        })?;

        Ok(InputRecord {
            line,
            op,
            key: AccountKey::new(card, pin),
            name,
            amount,
        })
    }
}

impl<R: Read> Iterator for CsvParser<R> {
    type Item = Result<InputRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}
