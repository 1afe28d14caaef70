//! Price table domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::errors::{Result, ValidationError};

/// Closing price of one ticker on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl DailyPrice {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// Outcome of looking up a ticker's price history with a market-data source.
///
/// Retrieval failures are reported as data, never thrown, so that the caller
/// can decide which trades to exclude and say why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum PriceAvailability {
    Available { prices: Vec<DailyPrice> },
    Unavailable { reason: String },
}

impl PriceAvailability {
    pub fn available(prices: Vec<DailyPrice>) -> Self {
        PriceAvailability::Available { prices }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        PriceAvailability::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PriceAvailability::Available { .. })
    }
}

/// Dense date × ticker price matrix.
///
/// The date axis is the authoritative calendar for a valuation run: strictly
/// increasing and unique. A `None` cell means no price was published for that
/// ticker on that date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    prices: Vec<Vec<Option<Decimal>>>,
}

impl PriceTable {
    /// Builds a table from rows of `(date, prices in ticker order)`.
    pub fn new(tickers: Vec<String>, rows: Vec<(NaiveDate, Vec<Option<Decimal>>)>) -> Result<Self> {
        let mut seen = HashSet::new();
        for ticker in &tickers {
            if ticker.trim().is_empty() {
                return Err(ValidationError::InvalidInput("Price table has an empty ticker column".to_string()).into());
            }
            if !seen.insert(ticker.as_str()) {
                return Err(ValidationError::InvalidInput(format!(
                    "Price table has duplicate ticker column '{}'",
                    ticker
                ))
                .into());
            }
        }

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(rows.len());
        let mut prices: Vec<Vec<Option<Decimal>>> = Vec::with_capacity(rows.len());
        for (date, row) in rows {
            if let Some(previous) = dates.last() {
                if date <= *previous {
                    return Err(ValidationError::InvalidInput(format!(
                        "Price table dates must be strictly increasing: {} follows {}",
                        date, previous
                    ))
                    .into());
                }
            }
            if row.len() != tickers.len() {
                return Err(ValidationError::InvalidInput(format!(
                    "Price row for {} has {} values, expected {}",
                    date,
                    row.len(),
                    tickers.len()
                ))
                .into());
            }
            if let Some((idx, price)) = row
                .iter()
                .enumerate()
                .find_map(|(i, p)| p.filter(|v| *v < Decimal::ZERO).map(|v| (i, v)))
            {
                return Err(ValidationError::InvalidInput(format!(
                    "Negative price {} for {} on {}",
                    price, tickers[idx], date
                ))
                .into());
            }
            dates.push(date);
            prices.push(row);
        }

        Ok(Self {
            dates,
            tickers,
            prices,
        })
    }

    /// Assembles a table from per-ticker availability results.
    ///
    /// Only available tickers become columns. The date axis is the union of
    /// every available ticker's dates; a ticker with no price on one of those
    /// dates gets a "no data" cell.
    pub fn from_histories(histories: &BTreeMap<String, PriceAvailability>) -> Result<Self> {
        let mut tickers = Vec::new();
        let mut by_ticker: Vec<BTreeMap<NaiveDate, Decimal>> = Vec::new();
        let mut all_dates = BTreeSet::new();

        for (ticker, availability) in histories {
            if let PriceAvailability::Available { prices } = availability {
                let mut series = BTreeMap::new();
                for point in prices {
                    all_dates.insert(point.date);
                    series.insert(point.date, point.close);
                }
                tickers.push(ticker.clone());
                by_ticker.push(series);
            }
        }

        let rows = all_dates
            .into_iter()
            .map(|date| {
                let row = by_ticker.iter().map(|series| series.get(&date).copied()).collect();
                (date, row)
            })
            .collect();

        Self::new(tickers, rows)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn has_ticker(&self, ticker: &str) -> bool {
        self.ticker_index(ticker).is_some()
    }

    /// Prices for every ticker on the date at `date_idx`, in ticker order.
    pub fn row(&self, date_idx: usize) -> &[Option<Decimal>] {
        &self.prices[date_idx]
    }

    pub fn price(&self, date_idx: usize, ticker_idx: usize) -> Option<Decimal> {
        self.prices.get(date_idx).and_then(|row| row.get(ticker_idx).copied().flatten())
    }

    pub fn price_on(&self, date: NaiveDate, ticker: &str) -> Option<Decimal> {
        let date_idx = self.date_index(date)?;
        let ticker_idx = self.ticker_index(ticker)?;
        self.price(date_idx, ticker_idx)
    }

    pub fn date_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Index of the first date on or after `date`, if any.
    pub fn first_index_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d < date);
        (idx < self.dates.len()).then_some(idx)
    }

    /// Rows dated within `[start, end]`. Either bound may be open.
    pub fn within(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PriceTable {
        let (dates, prices): (Vec<NaiveDate>, Vec<Vec<Option<Decimal>>>) = self
            .dates
            .iter()
            .zip(&self.prices)
            .filter(|(d, _)| start.map_or(true, |s| **d >= s))
            .filter(|(d, _)| end.map_or(true, |e| **d <= e))
            .map(|(d, row)| (*d, row.clone()))
            .unzip();
        PriceTable {
            dates,
            tickers: self.tickers.clone(),
            prices,
        }
    }
}
