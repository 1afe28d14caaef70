use log::{debug, error, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::errors::{Result, ValuationError};
use crate::portfolio::holdings::HoldingsMatrix;
use crate::portfolio::valuation::AumPoint;
use crate::prices::PriceTable;

/// Mark-to-market total for a single date before any carry-forward.
struct RawValuation {
    total: Decimal,
    unpriced: Vec<String>,
}

/// Calculates the AUM series: for each date, the sum over tickers of
/// `price × quantity held`.
///
/// A ticker with an open position and no price contributes nothing that day.
/// If that leaves the total at exactly zero on any date after the first, the
/// previous date's AUM is carried forward instead. A zero on the first date
/// is returned as-is. A zero from a fully priced row (a close of exactly 0,
/// or a book with no open positions) is kept as-is too.
///
/// Dates are valued in parallel; each date sums its tickers in column order,
/// so the output does not depend on thread scheduling.
pub fn calculate_aum(prices: &PriceTable, holdings: &HoldingsMatrix) -> Result<Vec<AumPoint>> {
    if prices.dates() != holdings.dates() {
        error!(
            "Holdings span {} dates but price table spans {}",
            holdings.len(),
            prices.len()
        );
        return Err(ValuationError::DataIntegrity(
            "holdings matrix and price table do not share a date axis".to_string(),
        )
        .into());
    }

    let columns = holdings
        .tickers()
        .iter()
        .map(|ticker| {
            prices.ticker_index(ticker).ok_or_else(|| {
                ValuationError::DataIntegrity(format!("holdings ticker {} has no price column", ticker))
            })
        })
        .collect::<std::result::Result<Vec<usize>, _>>()?;

    let raw: Vec<RawValuation> = (0..holdings.len())
        .into_par_iter()
        .map(|date_idx| value_date(prices, holdings, &columns, date_idx))
        .collect();

    let mut series: Vec<AumPoint> = Vec::with_capacity(raw.len());
    for (date_idx, valuation) in raw.into_iter().enumerate() {
        let date = holdings.dates()[date_idx];
        let previous = series.last().map(|p| p.value);

        let carry = valuation.total.is_zero() && !valuation.unpriced.is_empty();
        let (value, carried_forward) = match previous {
            Some(prev) if carry => {
                warn!(
                    "No prices for open positions {:?} on {}; carrying forward AUM {}",
                    valuation.unpriced, date, prev
                );
                (prev, true)
            }
            _ => {
                if !valuation.unpriced.is_empty() {
                    debug!(
                        "Missing prices on {} for {:?}; valued without them",
                        date, valuation.unpriced
                    );
                }
                (valuation.total, false)
            }
        };

        series.push(AumPoint {
            date,
            value,
            carried_forward,
            unpriced: valuation.unpriced,
        });
    }

    Ok(series)
}

fn value_date(
    prices: &PriceTable,
    holdings: &HoldingsMatrix,
    columns: &[usize],
    date_idx: usize,
) -> RawValuation {
    let mut total = Decimal::ZERO;
    let mut unpriced = Vec::new();

    for (ticker_idx, quantity) in holdings.row(date_idx).iter().enumerate() {
        if quantity.is_zero() {
            continue;
        }
        match prices.price(date_idx, columns[ticker_idx]) {
            Some(price) => total += price * *quantity,
            None => unpriced.push(holdings.tickers()[ticker_idx].clone()),
        }
    }

    RawValuation { total, unpriced }
}
