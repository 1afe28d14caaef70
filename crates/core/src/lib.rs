//! Fundnav Core - unitized valuation of a personal trading ledger.
//!
//! Given executed trades and a daily close-price table, this crate derives the
//! daily holdings, the portfolio's assets under management and a NAV-per-unit
//! series that separates investment performance from the timing of cash flows.
//! Apart from reading broker tradebooks from a directory it does no I/O.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod prices;
pub mod trades;

pub use portfolio::*;
pub use prices::{PriceAvailability, PriceTable};
pub use trades::{TradeEvent, TradeLedger, TradeType};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
pub use errors::ValuationError;
