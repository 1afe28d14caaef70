use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::holdings_model::{HoldingsMatrix, TradeSchedule};
use crate::errors::{Result, ValuationError};
use crate::prices::PriceTable;
use crate::trades::TradeLedger;

/// Buckets every trade onto the first price date on or after its trade date.
///
/// Fails with [`ValuationError::Configuration`] on the first trade whose
/// ticker has no price column. Trades dated after the last price date are
/// kept aside in `excluded`.
pub fn schedule_trades(ledger: &TradeLedger, prices: &PriceTable) -> Result<TradeSchedule> {
    let mut schedule = TradeSchedule {
        dates: prices.dates().to_vec(),
        by_date: vec![Vec::new(); prices.len()],
        excluded: Vec::new(),
    };

    for trade in ledger.events() {
        if !prices.has_ticker(&trade.ticker) {
            error!(
                "Trade on {} references {} which has no price history",
                trade.date, trade.ticker
            );
            return Err(ValuationError::Configuration {
                ticker: trade.ticker.clone(),
                date: trade.date,
            }
            .into());
        }

        match prices.first_index_on_or_after(trade.date) {
            Some(idx) => {
                if prices.dates()[idx] != trade.date {
                    debug!(
                        "Trade {} on {} applied on next price date {}",
                        trade.ticker,
                        trade.date,
                        prices.dates()[idx]
                    );
                }
                schedule.by_date[idx].push(trade.clone());
            }
            None => {
                warn!(
                    "Trade {} on {} is after the last price date; excluded from valuation",
                    trade.ticker, trade.date
                );
                schedule.excluded.push(trade.clone());
            }
        }
    }

    Ok(schedule)
}

/// Folds the scheduled trades into a dense holdings matrix.
///
/// Same-day trades on one ticker accumulate. The carry from the previous date
/// is applied once per date, after all of that date's trades are summed, so
/// the result does not depend on the order of trades within a day.
pub fn build_holdings(schedule: &TradeSchedule, tickers: &[String]) -> Result<HoldingsMatrix> {
    let index: HashMap<&str, usize> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let mut quantities: Vec<Vec<Decimal>> = Vec::with_capacity(schedule.dates.len());
    let mut carried = vec![Decimal::ZERO; tickers.len()];

    for (date_idx, date) in schedule.dates.iter().enumerate() {
        let mut deltas: Vec<Option<Decimal>> = vec![None; tickers.len()];
        for trade in schedule.trades_on(date_idx) {
            let ticker_idx = *index.get(trade.ticker.as_str()).ok_or_else(|| {
                ValuationError::Configuration {
                    ticker: trade.ticker.clone(),
                    date: trade.date,
                }
            })?;
            *deltas[ticker_idx].get_or_insert(Decimal::ZERO) += trade.signed_quantity;
        }

        for (ticker_idx, delta) in deltas.into_iter().enumerate() {
            if let Some(delta) = delta {
                carried[ticker_idx] += delta;
                debug!(
                    "{} {}: {} -> {}",
                    date, tickers[ticker_idx], delta, carried[ticker_idx]
                );
            }
        }
        quantities.push(carried.clone());
    }

    let matrix = HoldingsMatrix::from_parts(schedule.dates.clone(), tickers.to_vec(), quantities);
    verify_accumulation(&matrix, schedule)?;
    Ok(matrix)
}

/// Builds the holdings matrix for `ledger` on the date axis of `prices`.
///
/// Covers every price date and every ticker that appears in the ledger.
pub fn calculate_holdings(ledger: &TradeLedger, prices: &PriceTable) -> Result<HoldingsMatrix> {
    let schedule = schedule_trades(ledger, prices)?;
    let tickers: Vec<String> = ledger.tickers().into_iter().collect();
    build_holdings(&schedule, &tickers)
}

/// Re-derives each ticker's day-over-day change from the matrix and checks it
/// against the scheduled trades. Any mismatch means a trade was dropped or
/// overwritten instead of summed.
fn verify_accumulation(matrix: &HoldingsMatrix, schedule: &TradeSchedule) -> Result<()> {
    let tickers = matrix.tickers();
    let mut expected: HashMap<&str, Decimal> = HashMap::new();

    for date_idx in 0..matrix.len() {
        expected.clear();
        for trade in schedule.trades_on(date_idx) {
            *expected.entry(trade.ticker.as_str()).or_insert(Decimal::ZERO) += trade.signed_quantity;
        }

        for (ticker_idx, ticker) in tickers.iter().enumerate() {
            let today = matrix.row(date_idx)[ticker_idx];
            let yesterday = if date_idx == 0 {
                Decimal::ZERO
            } else {
                matrix.row(date_idx - 1)[ticker_idx]
            };
            let traded = expected.get(ticker.as_str()).copied().unwrap_or(Decimal::ZERO);
            if today - yesterday != traded {
                error!(
                    "Holdings for {} on {} moved by {} but trades sum to {}",
                    ticker,
                    matrix.dates()[date_idx],
                    today - yesterday,
                    traded
                );
                return Err(ValuationError::DataIntegrity(format!(
                    "holdings for {} on {} do not match the sum of that day's trades",
                    ticker,
                    matrix.dates()[date_idx]
                ))
                .into());
            }
        }
    }
    Ok(())
}
