//! Broker tradebook ingestion.
//!
//! Reads raw broker exports, identifies the broker from the header row and
//! normalizes every row into a [`TradeEvent`].

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use super::broker_format::BrokerFormat;
use super::trades_model::{TradeEvent, TradeLedger, TradeType};
use crate::errors::{Error, Result, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const EXECUTION_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// One row of a Zerodha tradebook. Numeric fields are kept as text so that
/// parse failures can name the offending row.
#[derive(Debug, Deserialize)]
struct ZerodhaRow {
    symbol: String,
    trade_date: String,
    trade_type: String,
    quantity: String,
    price: String,
    trade_id: Option<String>,
    order_execution_time: Option<String>,
}

/// Parses a single tradebook export.
///
/// # Arguments
/// * `content` - Raw bytes of the CSV file
/// * `ticker_suffix` - Appended to every symbol (e.g. ".NS")
pub fn parse_tradebook(content: &[u8], ticker_suffix: &str) -> Result<Vec<TradeEvent>> {
    let content = strip_bom(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let format = BrokerFormat::detect(&headers).ok_or_else(|| {
        Error::Tradebook(format!("Unrecognized tradebook columns: {}", headers.join(",")))
    })?;
    debug!("Detected {} tradebook format", format.name());

    match format {
        BrokerFormat::Zerodha => parse_zerodha_rows(&mut reader, ticker_suffix),
    }
}

fn parse_zerodha_rows<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    ticker_suffix: &str,
) -> Result<Vec<TradeEvent>> {
    let headers: StringRecord = reader.headers()?.clone();
    let mut trades = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        // Header is line 1, so data rows start at line 2.
        let line = index + 2;
        let row: ZerodhaRow = record.deserialize(Some(&headers))?;
        trades.push(zerodha_row_to_trade(row, ticker_suffix, line)?);
    }

    Ok(trades)
}

fn zerodha_row_to_trade(row: ZerodhaRow, ticker_suffix: &str, line: usize) -> Result<TradeEvent> {
    let date = NaiveDate::parse_from_str(&row.trade_date, DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidInput(format!(
            "Line {}: invalid trade_date '{}': {}",
            line, row.trade_date, e
        ))
    })?;
    let trade_type = TradeType::from_str(&row.trade_type)?;
    let quantity = parse_decimal(&row.quantity, "quantity", line)?;
    let price = parse_decimal(&row.price, "price", line)?;

    let mut trade = TradeEvent::new(
        date,
        format!("{}{}", row.symbol, ticker_suffix),
        trade_type,
        quantity,
        price,
    )?;

    if let Some(raw) = row.order_execution_time.as_deref().filter(|s| !s.is_empty()) {
        trade = trade.with_execution_time(parse_execution_time(raw, line)?);
    }
    if let Some(id) = row.trade_id.filter(|s| !s.is_empty()) {
        trade = trade.with_trade_id(id);
    }
    Ok(trade)
}

fn parse_decimal(raw: &str, field: &str, line: usize) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        ValidationError::InvalidInput(format!("Line {}: invalid {} '{}': {}", line, field, raw, e))
            .into()
    })
}

fn parse_execution_time(raw: &str, line: usize) -> Result<NaiveDateTime> {
    EXECUTION_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "Line {}: invalid order_execution_time '{}'",
                line, raw
            ))
            .into()
        })
}

fn strip_bom(content: &[u8]) -> &[u8] {
    content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content)
}

/// Loads every `*.csv` tradebook in `dir` into one chronologically sorted ledger.
///
/// Files whose header matches no known broker are skipped with a warning;
/// malformed rows inside a recognised file are an error.
pub fn load_tradebooks(dir: &Path, ticker_suffix: &str) -> Result<TradeLedger> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    paths.sort();

    let mut events = Vec::new();
    for path in &paths {
        let content = std::fs::read(path)?;
        match parse_tradebook(&content, ticker_suffix) {
            Ok(trades) => {
                debug!("Loaded {} trades from {}", trades.len(), path.display());
                events.extend(trades);
            }
            Err(Error::Tradebook(msg)) => {
                warn!("Skipping {}: {}", path.display(), msg);
            }
            Err(e) => return Err(e),
        }
    }

    let ledger = TradeLedger::new(events);
    info!(
        "Loaded {} trades across {} tickers from {}",
        ledger.len(),
        ledger.tickers().len(),
        dir.display()
    );
    Ok(ledger)
}
