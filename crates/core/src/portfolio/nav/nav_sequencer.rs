use log::{debug, error, warn};
use rust_decimal::Decimal;

use super::nav_model::NavPoint;
use crate::errors::{Error, Result, ValuationError};
use crate::portfolio::holdings::TradeSchedule;
use crate::portfolio::valuation::AumPoint;

/// Units and NAV carried from one date to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FundState {
    units: Decimal,
    nav: Decimal,
}

/// Derives the unit count and NAV per unit for every date.
///
/// The first date issues `aum / initial_nav` units, so its NAV equals
/// `initial_nav`. On each later date the day's net trade notional creates
/// (buy) or redeems (sell) units at the previous date's NAV, and NAV is then
/// struck as `aum / units`. Dates without trades keep the unit count.
///
/// The recurrence is strictly sequential: each date depends on the previous
/// date's units and NAV.
pub fn sequence_nav(
    aum: &[AumPoint],
    schedule: &TradeSchedule,
    initial_nav: Decimal,
) -> Result<Vec<NavPoint>> {
    if initial_nav <= Decimal::ZERO {
        return Err(Error::InvalidConfigValue(format!(
            "initial NAV must be positive, got {}",
            initial_nav
        )));
    }

    let mut series: Vec<NavPoint> = Vec::with_capacity(aum.len());
    let mut state: Option<FundState> = None;

    for (date_idx, point) in aum.iter().enumerate() {
        let flow = schedule.net_notional(date_idx);
        let next = match state {
            None => initial_state(point, initial_nav)?,
            Some(prev) => transition(prev, point, flow)?,
        };

        debug!(
            "{}: aum={} flow={} units={} nav={}",
            point.date,
            point.value,
            flow.unwrap_or(Decimal::ZERO),
            next.units,
            next.nav
        );

        series.push(NavPoint {
            date: point.date,
            aum: point.value,
            units: next.units,
            nav: next.nav,
            net_flow: flow.unwrap_or(Decimal::ZERO),
            aum_carried_forward: point.carried_forward,
        });
        state = Some(next);
    }

    Ok(series)
}

fn initial_state(point: &AumPoint, initial_nav: Decimal) -> Result<FundState> {
    let units = point.value.checked_div(initial_nav).ok_or_else(|| {
        ValuationError::Computation(format!("cannot issue initial units on {}", point.date))
    })?;
    // Struck through the general formula so a zero opening AUM fails here.
    let nav = point.value.checked_div(units).ok_or_else(|| {
        error!("AUM on first date {} is zero; the fund has no opening value", point.date);
        ValuationError::Computation(format!(
            "AUM on first date {} is zero; units cannot be denominated",
            point.date
        ))
    })?;
    Ok(FundState { units, nav })
}

fn transition(prev: FundState, point: &AumPoint, flow: Option<Decimal>) -> Result<FundState> {
    let units = match flow {
        Some(flow) if flow.is_zero() => prev.units,
        Some(flow) => {
            let issued = flow.checked_div(prev.nav).ok_or_else(|| {
                error!(
                    "Cannot unitize trade flow {} on {}: previous NAV is zero",
                    flow, point.date
                );
                ValuationError::Computation(format!(
                    "previous NAV is zero; cannot unitize a flow of {} on {}",
                    flow, point.date
                ))
            })?;
            prev.units + issued
        }
        None => prev.units,
    };

    if units <= Decimal::ZERO {
        if !point.value.is_zero() {
            error!(
                "Fund has {} units outstanding on {} but AUM is {}",
                units, point.date, point.value
            );
            return Err(ValuationError::DataIntegrity(format!(
                "AUM of {} on {} with {} units outstanding",
                point.value, point.date, units
            ))
            .into());
        }
        // An exit above the previous NAV redeems more units than exist.
        if !units.is_zero() {
            warn!(
                "Units went to {} on {} with nothing held; treating the fund as fully redeemed",
                units, point.date
            );
        }
        // Fully redeemed and nothing held: the fund is dormant at its last NAV.
        return Ok(FundState {
            units: Decimal::ZERO,
            nav: prev.nav,
        });
    }

    let nav = point.value.checked_div(units).ok_or_else(|| {
        ValuationError::Computation(format!("NAV overflow on {}", point.date))
    })?;
    Ok(FundState { units, nav })
}
