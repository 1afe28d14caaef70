//! Portfolio valuation pipeline.
//!
//! Trades are folded into a [`holdings`] matrix, marked to market into an AUM
//! series by [`valuation`], and unitized into NAV per unit by [`nav`].
//! [`fund`] wires the stages together; [`performance`] summarizes the output.

pub mod fund;
pub mod holdings;
pub mod nav;
pub mod performance;
pub mod valuation;

pub use fund::{compute_valuation, FundConfig, FundService};
pub use holdings::{HoldingsMatrix, TradeSchedule};
pub use nav::{NavPoint, ValuationResult};
pub use performance::{summarize, PerformanceSummary};
pub use valuation::AumPoint;
