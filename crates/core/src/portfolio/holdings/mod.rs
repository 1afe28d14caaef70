//! Holdings matrix: trades folded into end-of-day positions per ticker.

pub mod holdings_calculator;
mod holdings_model;

pub use holdings_calculator::*;
pub use holdings_model::*;
