//! Ticker eligibility: which traded tickers have price history.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::price_model::{PriceAvailability, PriceTable};
use crate::trades::TradeLedger;

/// A ticker excluded from valuation and the reason it was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IneligibleTicker {
    pub ticker: String,
    pub reason: String,
}

/// Split of traded tickers into those with and without price history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub eligible: BTreeSet<String>,
    pub ineligible: Vec<IneligibleTicker>,
}

impl EligibilityReport {
    /// Drops every trade on an ineligible ticker, logging each exclusion.
    pub fn apply(&self, ledger: &TradeLedger) -> TradeLedger {
        for excluded in &self.ineligible {
            warn!(
                "Ticker {} is excluded from the analysis: {}",
                excluded.ticker, excluded.reason
            );
        }
        let filtered = ledger.retain_tickers(&self.eligible);
        if filtered.len() != ledger.len() {
            info!(
                "Eligibility filter dropped {} of {} trades",
                ledger.len() - filtered.len(),
                ledger.len()
            );
        }
        filtered
    }

    pub fn is_fully_eligible(&self) -> bool {
        self.ineligible.is_empty()
    }
}

/// Partitions tickers by the availability results a price source returned.
pub fn partition_eligible(histories: &BTreeMap<String, PriceAvailability>) -> EligibilityReport {
    let mut report = EligibilityReport::default();
    for (ticker, availability) in histories {
        match availability {
            PriceAvailability::Available { prices } if !prices.is_empty() => {
                report.eligible.insert(ticker.clone());
            }
            PriceAvailability::Available { .. } => report.ineligible.push(IneligibleTicker {
                ticker: ticker.clone(),
                reason: "no price history returned".to_string(),
            }),
            PriceAvailability::Unavailable { reason } => report.ineligible.push(IneligibleTicker {
                ticker: ticker.clone(),
                reason: reason.clone(),
            }),
        }
    }
    report
}

/// Checks every ledger ticker against the columns of an existing price table.
pub fn eligibility_against_table(ledger: &TradeLedger, prices: &PriceTable) -> EligibilityReport {
    let mut report = EligibilityReport::default();
    for ticker in ledger.tickers() {
        if prices.has_ticker(&ticker) {
            report.eligible.insert(ticker);
        } else {
            report.ineligible.push(IneligibleTicker {
                ticker,
                reason: "no column in price table".to_string(),
            });
        }
    }
    report
}
