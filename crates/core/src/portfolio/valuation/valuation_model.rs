//! Portfolio valuation domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Assets under management on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AumPoint {
    pub date: NaiveDate,
    pub value: Decimal,
    /// True when no fresh price was available and the previous date's value
    /// was carried forward.
    #[serde(default)]
    pub carried_forward: bool,
    /// Tickers with an open position but no price on this date.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unpriced: Vec<String>,
}
