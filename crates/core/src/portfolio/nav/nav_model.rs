//! Unitized fund models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::holdings::HoldingsMatrix;

/// State of the synthetic fund at the close of one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavPoint {
    pub date: NaiveDate,
    pub aum: Decimal,
    /// Units outstanding after the day's creations and redemptions.
    pub units: Decimal,
    /// NAV per unit: `aum / units`.
    pub nav: Decimal,
    /// Net trade notional effective this date; zero when nothing traded.
    pub net_flow: Decimal,
    /// AUM was carried forward from the previous date for lack of prices.
    #[serde(default)]
    pub aum_carried_forward: bool,
}

/// Output of one valuation run. Every series shares the price table's dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub holdings: HoldingsMatrix,
    pub series: Vec<NavPoint>,
}

impl ValuationResult {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.series.iter().map(|p| p.date).collect()
    }

    pub fn aum_series(&self) -> Vec<Decimal> {
        self.series.iter().map(|p| p.aum).collect()
    }

    pub fn units_series(&self) -> Vec<Decimal> {
        self.series.iter().map(|p| p.units).collect()
    }

    pub fn nav_series(&self) -> Vec<Decimal> {
        self.series.iter().map(|p| p.nav).collect()
    }

    pub fn latest(&self) -> Option<&NavPoint> {
        self.series.last()
    }

    pub fn on(&self, date: NaiveDate) -> Option<&NavPoint> {
        self.series
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| &self.series[idx])
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
