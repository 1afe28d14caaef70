//! Price data consumed by the valuation engine.
//!
//! - [`price_model`] - `PriceTable` and per-ticker availability results
//! - [`eligibility`] - splitting traded tickers by price availability
//! - [`price_import`] - wide-format price CSV parsing
//!
//! Fetching prices from a market-data provider is outside this crate; callers
//! hand over either a ready `PriceTable` or per-ticker `PriceAvailability`.

pub mod eligibility;
pub mod price_import;
mod price_model;

pub use eligibility::{eligibility_against_table, partition_eligible, EligibilityReport, IneligibleTicker};
pub use price_import::parse_price_table;
pub use price_model::*;
