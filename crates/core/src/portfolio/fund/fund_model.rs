use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INITIAL_NAV;
use crate::errors::{Error, Result};

/// Settings for constructing a fund from a trade ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundConfig {
    /// NAV per unit on the first valuation date.
    #[serde(default = "default_initial_nav")]
    pub initial_nav: Decimal,
    /// First date to value. Defaults to the ledger's first trade date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last date to value. Defaults to the last price date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Exchange suffix appended to broker symbols, e.g. ".NS".
    #[serde(default)]
    pub ticker_suffix: Option<String>,
}

fn default_initial_nav() -> Decimal {
    DEFAULT_INITIAL_NAV
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            initial_nav: DEFAULT_INITIAL_NAV,
            start_date: None,
            end_date: None,
            ticker_suffix: None,
        }
    }
}

impl FundConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_nav <= Decimal::ZERO {
            return Err(Error::InvalidConfigValue(format!(
                "initialNav must be positive, got {}",
                self.initial_nav
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::InvalidConfigValue(format!(
                    "startDate {} is after endDate {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    pub fn ticker_suffix(&self) -> &str {
        self.ticker_suffix.as_deref().unwrap_or("")
    }
}
