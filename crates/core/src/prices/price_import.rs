//! Price table CSV import.
//!
//! Expects a wide layout: a `date` column followed by one column per ticker.
//! Blank, `NaN` and `null` cells mean no price was available.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::price_model::PriceTable;
use crate::errors::{Result, ValidationError};

const DATE_COLUMN: &str = "date";
const MISSING_MARKERS: [&str; 4] = ["", "nan", "null", "n/a"];

/// Parses a wide-format price CSV into a [`PriceTable`].
pub fn parse_price_table(content: &[u8]) -> Result<PriceTable> {
    let content = content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    let mut columns = headers.iter();
    match columns.next() {
        Some(first) if first.eq_ignore_ascii_case(DATE_COLUMN) => {}
        _ => return Err(ValidationError::MissingField(DATE_COLUMN.to_string()).into()),
    }
    let tickers: Vec<String> = columns.map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        let raw_date = record.get(0).unwrap_or_default();
        if raw_date.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            ValidationError::InvalidInput(format!("Line {}: invalid date '{}': {}", line, raw_date, e))
        })?;

        let mut row = Vec::with_capacity(tickers.len());
        for (col, ticker) in tickers.iter().enumerate() {
            let raw = record.get(col + 1).unwrap_or_default();
            row.push(parse_price_cell(raw, ticker, line)?);
        }
        rows.push((date, row));
    }

    debug!("Parsed price table with {} dates and {} tickers", rows.len(), tickers.len());
    PriceTable::new(tickers, rows)
}

fn parse_price_cell(raw: &str, ticker: &str, line: usize) -> Result<Option<Decimal>> {
    if MISSING_MARKERS.contains(&raw.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(Some)
        .map_err(|e| {
            ValidationError::InvalidInput(format!(
                "Line {}: invalid price '{}' for {}: {}",
                line, raw, ticker, e
            ))
            .into()
        })
}
