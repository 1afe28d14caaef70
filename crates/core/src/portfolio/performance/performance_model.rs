use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnData {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// NAV-based performance of the fund over a valuation run.
///
/// Because flows are unitized, these figures measure investment performance
/// independently of when money was added or withdrawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub period_start_date: NaiveDate,
    pub period_end_date: NaiveDate,
    pub start_nav: Decimal,
    pub end_nav: Decimal,
    /// Day-over-day NAV returns, starting from the second date.
    pub returns: Vec<ReturnData>,
    /// `end_nav / start_nav - 1`
    pub cumulative_return: Decimal,
    /// Cumulative return scaled to a 365-day year. `None` for periods shorter
    /// than one day or when the NAV went to zero.
    pub annualized_return: Option<Decimal>,
    /// Largest peak-to-trough NAV decline, as a positive fraction of the peak.
    pub max_drawdown: Decimal,
}
