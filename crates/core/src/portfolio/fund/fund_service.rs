use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::fund_model::FundConfig;
use crate::errors::Result;
use crate::portfolio::holdings::{build_holdings, schedule_trades};
use crate::portfolio::nav::{sequence_nav, ValuationResult};
use crate::portfolio::valuation::calculate_aum;
use crate::prices::{partition_eligible, PriceAvailability, PriceTable};
use crate::trades::TradeLedger;

/// Values a trade ledger against a price table as a unitized fund.
///
/// Produces the holdings matrix, AUM, units and NAV for every date of
/// `prices`. Any valuation error aborts the run; no partial series is
/// returned.
pub fn compute_valuation(
    ledger: &TradeLedger,
    prices: &PriceTable,
    initial_nav: Decimal,
) -> Result<ValuationResult> {
    if prices.is_empty() {
        warn!("Price table has no dates; nothing to value");
    }

    let schedule = schedule_trades(ledger, prices)?;
    let tickers: Vec<String> = ledger.tickers().into_iter().collect();
    let holdings = build_holdings(&schedule, &tickers)?;
    let aum = calculate_aum(prices, &holdings)?;
    let series = sequence_nav(&aum, &schedule, initial_nav)?;

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        info!(
            "Valued {} trades over {} dates ({}..{}): AUM {} -> {}, NAV {} -> {}",
            schedule.scheduled_count(),
            series.len(),
            first.date,
            last.date,
            first.aum,
            last.aum,
            first.nav,
            last.nav
        );
    }

    Ok(ValuationResult { holdings, series })
}

/// Constructs a personal fund from trades and prices under a fixed configuration.
#[derive(Debug, Clone)]
pub struct FundService {
    config: FundConfig,
}

impl FundService {
    pub fn new(config: FundConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FundConfig {
        &self.config
    }

    /// Values the fund over the configured window.
    ///
    /// The window starts at the configured start date, or the first trade date
    /// when none is set, and ends at the configured end date if any. Trades
    /// and prices outside the window are ignored.
    pub fn construct(&self, ledger: &TradeLedger, prices: &PriceTable) -> Result<ValuationResult> {
        let start = self.config.start_date.or_else(|| ledger.first_date());
        let end = self.config.end_date;

        let ledger = ledger.within(start, end);
        let prices = prices.within(start, end);
        info!(
            "Constructing fund from {} trades, window {}..{}",
            ledger.len(),
            start.map_or_else(|| "-".to_string(), |d| d.to_string()),
            end.map_or_else(|| "-".to_string(), |d| d.to_string())
        );

        compute_valuation(&ledger, &prices, self.config.initial_nav)
    }

    /// Values the fund from per-ticker price lookups, excluding the trades of
    /// tickers whose history is unavailable.
    pub fn construct_from_histories(
        &self,
        ledger: &TradeLedger,
        histories: &BTreeMap<String, PriceAvailability>,
    ) -> Result<ValuationResult> {
        let report = partition_eligible(histories);
        let eligible = report.apply(ledger);
        let prices = PriceTable::from_histories(histories)?;
        self.construct(&eligible, &prices)
    }
}
