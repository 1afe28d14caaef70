use log::debug;
use rust_decimal::{Decimal, MathematicalOps};

use super::performance_model::{PerformanceSummary, ReturnData};
use crate::errors::{Result, ValuationError};
use crate::portfolio::nav::ValuationResult;

const DAYS_PER_YEAR: i64 = 365;

/// Summarizes the NAV series of a valuation run.
pub fn summarize(result: &ValuationResult) -> Result<PerformanceSummary> {
    let (first, last) = match (result.series.first(), result.series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(ValuationError::Computation(
                "cannot summarize an empty NAV series".to_string(),
            )
            .into())
        }
    };

    let returns = daily_returns(result);
    let cumulative_return = last
        .nav
        .checked_div(first.nav)
        .map(|ratio| ratio - Decimal::ONE)
        .ok_or_else(|| ValuationError::Computation(format!("NAV on {} is zero", first.date)))?;

    let days = (last.date - first.date).num_days();
    let annualized_return = annualize(cumulative_return, days);
    let max_drawdown = max_drawdown(result);

    debug!(
        "Performance {}..{}: cumulative={} max_drawdown={}",
        first.date, last.date, cumulative_return, max_drawdown
    );

    Ok(PerformanceSummary {
        period_start_date: first.date,
        period_end_date: last.date,
        start_nav: first.nav,
        end_nav: last.nav,
        returns,
        cumulative_return,
        annualized_return,
        max_drawdown,
    })
}

fn daily_returns(result: &ValuationResult) -> Vec<ReturnData> {
    result
        .series
        .windows(2)
        .filter_map(|pair| {
            let ratio = pair[1].nav.checked_div(pair[0].nav)?;
            Some(ReturnData {
                date: pair[1].date,
                value: ratio - Decimal::ONE,
            })
        })
        .collect()
}

fn annualize(cumulative: Decimal, days: i64) -> Option<Decimal> {
    if days <= 0 {
        return None;
    }
    let growth = Decimal::ONE + cumulative;
    if growth <= Decimal::ZERO {
        return None;
    }
    let exponent = Decimal::from(DAYS_PER_YEAR).checked_div(Decimal::from(days))?;
    growth.checked_powd(exponent).map(|g| g - Decimal::ONE)
}

fn max_drawdown(result: &ValuationResult) -> Decimal {
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;
    for point in &result.series {
        if point.nav > peak {
            peak = point.nav;
        }
        if let Some(drawdown) = (peak - point.nav).checked_div(peak) {
            worst = worst.max(drawdown);
        }
    }
    worst
}
