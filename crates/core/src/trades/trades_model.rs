//! Trade ledger domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Direction of a trade. Only used as the sign source for quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "buy",
            TradeType::Sell => "sell",
        }
    }

    /// Applies this direction to an unsigned quantity.
    pub fn sign(&self, quantity: Decimal) -> Decimal {
        match self {
            TradeType::Buy => quantity,
            TradeType::Sell => -quantity,
        }
    }
}

impl FromStr for TradeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "b" => Ok(TradeType::Buy),
            "sell" | "s" => Ok(TradeType::Sell),
            other => Err(ValidationError::InvalidInput(format!("Unknown trade type '{}'", other)).into()),
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single executed trade. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TradeEventRecord")]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub ticker: String,
    /// Positive for a buy, negative for a sell.
    pub signed_quantity: Decimal,
    /// Executed price per share.
    pub price: Decimal,
    /// Broker execution timestamp, used to order trades within a day.
    #[serde(default)]
    pub executed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub trade_id: Option<String>,
}

/// Wire form of a [`TradeEvent`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TradeEventRecord {
    date: NaiveDate,
    ticker: String,
    signed_quantity: Decimal,
    price: Decimal,
    #[serde(default)]
    executed_at: Option<NaiveDateTime>,
    #[serde(default)]
    trade_id: Option<String>,
}

impl TryFrom<TradeEventRecord> for TradeEvent {
    type Error = Error;

    fn try_from(record: TradeEventRecord) -> Result<Self> {
        let trade_type = if record.signed_quantity.is_sign_negative() {
            TradeType::Sell
        } else {
            TradeType::Buy
        };
        let trade = TradeEvent::new(
            record.date,
            record.ticker,
            trade_type,
            record.signed_quantity.abs(),
            record.price,
        )?;
        Ok(TradeEvent {
            executed_at: record.executed_at,
            trade_id: record.trade_id,
            ..trade
        })
    }
}

impl TradeEvent {
    /// Creates a trade from an unsigned quantity and its direction.
    pub fn new(
        date: NaiveDate,
        ticker: impl Into<String>,
        trade_type: TradeType,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Trade quantity for {} on {} must be positive, got {}",
                ticker, date, quantity
            ))
            .into());
        }
        if price.is_sign_negative() {
            return Err(ValidationError::InvalidInput(format!(
                "Trade price for {} on {} must not be negative, got {}",
                ticker, date, price
            ))
            .into());
        }
        Ok(Self {
            date,
            ticker,
            signed_quantity: trade_type.sign(quantity),
            price,
            executed_at: None,
            trade_id: None,
        })
    }

    pub fn with_execution_time(mut self, executed_at: NaiveDateTime) -> Self {
        self.executed_at = Some(executed_at);
        self
    }

    pub fn with_trade_id(mut self, trade_id: impl Into<String>) -> Self {
        self.trade_id = Some(trade_id.into());
        self
    }

    pub fn trade_type(&self) -> TradeType {
        if self.signed_quantity.is_sign_negative() {
            TradeType::Sell
        } else {
            TradeType::Buy
        }
    }

    /// Cash value of the trade at its own executed price. Negative for sells.
    pub fn notional(&self) -> Decimal {
        self.signed_quantity * self.price
    }
}

/// Chronologically ordered sequence of trades.
///
/// Construction always re-sorts: by date first, then by execution timestamp.
/// The sort is stable, so trades without a timestamp keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TradeLedgerRecord")]
pub struct TradeLedger {
    events: Vec<TradeEvent>,
}

#[derive(Deserialize)]
struct TradeLedgerRecord {
    events: Vec<TradeEvent>,
}

impl From<TradeLedgerRecord> for TradeLedger {
    fn from(record: TradeLedgerRecord) -> Self {
        TradeLedger::new(record.events)
    }
}

impl TradeLedger {
    pub fn new(mut events: Vec<TradeEvent>) -> Self {
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.executed_at.cmp(&b.executed_at)));
        Self { events }
    }

    pub fn events(&self) -> &[TradeEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TradeEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct tickers referenced by the ledger, sorted.
    pub fn tickers(&self) -> BTreeSet<String> {
        self.events.iter().map(|e| e.ticker.clone()).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.events.first().map(|e| e.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.events.last().map(|e| e.date)
    }

    /// Trades dated within `[start, end]`. Either bound may be open.
    pub fn within(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> TradeLedger {
        let events = self
            .events
            .iter()
            .filter(|e| start.map_or(true, |s| e.date >= s))
            .filter(|e| end.map_or(true, |d| e.date <= d))
            .cloned()
            .collect();
        TradeLedger { events }
    }

    /// Keeps only the trades whose ticker is in `tickers`.
    pub fn retain_tickers(&self, tickers: &BTreeSet<String>) -> TradeLedger {
        let events = self
            .events
            .iter()
            .filter(|e| tickers.contains(&e.ticker))
            .cloned()
            .collect();
        TradeLedger { events }
    }

    /// Merges two ledgers, re-sorting the combined sequence.
    pub fn merge(self, other: TradeLedger) -> TradeLedger {
        let mut events = self.events;
        events.extend(other.events);
        TradeLedger::new(events)
    }
}

impl FromIterator<TradeEvent> for TradeLedger {
    fn from_iter<I: IntoIterator<Item = TradeEvent>>(iter: I) -> Self {
        TradeLedger::new(iter.into_iter().collect())
    }
}
