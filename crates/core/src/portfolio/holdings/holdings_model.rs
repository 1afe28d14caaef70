//! Holdings domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trades::TradeEvent;

/// Dense date × ticker matrix of end-of-day signed quantities.
///
/// Shares the price table's date axis. Every cell is defined: a ticker holds
/// exactly zero before its first trade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsMatrix {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    quantities: Vec<Vec<Decimal>>,
}

impl HoldingsMatrix {
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        quantities: Vec<Vec<Decimal>>,
    ) -> Self {
        debug_assert_eq!(dates.len(), quantities.len());
        Self {
            dates,
            tickers,
            quantities,
        }
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

    /// Quantities held on the date at `date_idx`, in ticker order.
    pub fn row(&self, date_idx: usize) -> &[Decimal] {
        &self.quantities[date_idx]
    }

    pub fn quantity(&self, date_idx: usize, ticker: &str) -> Option<Decimal> {
        let ticker_idx = self.ticker_index(ticker)?;
        self.quantities.get(date_idx).map(|row| row[ticker_idx])
    }

    pub fn quantity_on(&self, date: NaiveDate, ticker: &str) -> Option<Decimal> {
        let date_idx = self.dates.binary_search(&date).ok()?;
        self.quantity(date_idx, ticker)
    }

    /// Full time series for one ticker.
    pub fn column(&self, ticker: &str) -> Option<Vec<Decimal>> {
        let ticker_idx = self.ticker_index(ticker)?;
        Some(self.quantities.iter().map(|row| row[ticker_idx]).collect())
    }

    /// Tickers with a nonzero position on the date at `date_idx`.
    pub fn open_positions(&self, date_idx: usize) -> Vec<(&str, Decimal)> {
        self.tickers
            .iter()
            .zip(&self.quantities[date_idx])
            .filter(|(_, q)| !q.is_zero())
            .map(|(t, q)| (t.as_str(), *q))
            .collect()
    }
}

/// Trades bucketed onto the price table's date axis.
///
/// `by_date[i]` holds the trades effective on `dates[i]`, in ledger order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSchedule {
    pub dates: Vec<NaiveDate>,
    pub by_date: Vec<Vec<TradeEvent>>,
    /// Trades dated after the last price date.
    pub excluded: Vec<TradeEvent>,
}

impl TradeSchedule {
    pub fn trades_on(&self, date_idx: usize) -> &[TradeEvent] {
        self.by_date.get(date_idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_trades_on(&self, date_idx: usize) -> bool {
        !self.trades_on(date_idx).is_empty()
    }

    /// Net cash value of the trades effective on `date_idx`, each valued at
    /// its own executed price. `None` when no trade is effective that day.
    pub fn net_notional(&self, date_idx: usize) -> Option<Decimal> {
        let trades = self.trades_on(date_idx);
        if trades.is_empty() {
            return None;
        }
        Some(trades.iter().map(TradeEvent::notional).sum())
    }

    pub fn scheduled_count(&self) -> usize {
        self.by_date.iter().map(Vec::len).sum()
    }
}
