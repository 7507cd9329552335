//! Parsing of uploaded transaction CSV files.
//!
//! Expected layout, header line first:
//!
//! ```text
//! title, type, value, category
//! Salary, income, 5000, Job
//! Rent, outcome, 1200, Housing
//! ```
//!
//! Fields are trimmed. A row is dropped without error when its title is empty,
//! its type is not exactly `income` or `outcome`, or its value is not an
//! integer in `1..=MAX_TRANSACTION_VALUE`. Zero counts as missing and is
//! dropped as well.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use tracing::debug;

use crate::domain::models::{is_valid_value, TransactionType};

const TITLE_FIELD: usize = 0;
const TYPE_FIELD: usize = 1;
const VALUE_FIELD: usize = 2;
const CATEGORY_FIELD: usize = 3;

/// One CSV row that passed filtering
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub title: String,
    pub transaction_type: TransactionType,
    pub value: i64,
    pub category_title: String,
}

/// Lazily parse `reader`, skipping the header line and yielding only valid rows
/// in file order. The iterator consumes the reader and cannot be restarted.
pub fn parse_rows<R: Read>(reader: R) -> impl Iterator<Item = ImportRow> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
        .into_records()
        .filter_map(|result| match result {
            Ok(record) => parse_record(&record),
            Err(e) => {
                debug!("Discarding unreadable CSV row: {}", e);
                None
            }
        })
}

fn parse_record(record: &StringRecord) -> Option<ImportRow> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let field = |index: usize| record.get(index).unwrap_or("");

    let title = field(TITLE_FIELD);
    if title.is_empty() {
        debug!("Discarding CSV line {}: empty title", line);
        return None;
    }

    let transaction_type = match field(TYPE_FIELD).parse::<TransactionType>() {
        Ok(transaction_type) => transaction_type,
        Err(e) => {
            debug!("Discarding CSV line {}: {}", line, e);
            return None;
        }
    };

    let value = match field(VALUE_FIELD).parse::<i64>() {
        Ok(value) if is_valid_value(value) => value,
        _ => {
            debug!("Discarding CSV line {}: invalid value '{}'", line, field(VALUE_FIELD));
            return None;
        }
    };

    Some(ImportRow {
        title: title.to_string(),
        transaction_type,
        value,
        category_title: field(CATEGORY_FIELD).to_string(),
    })
}
