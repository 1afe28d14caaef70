//! Trade ledger: normalized trade events and broker tradebook ingestion.

mod broker_format;
mod trades_model;
pub mod tradebook_parser;

pub use broker_format::{BrokerFormat, ZERODHA_COLUMNS};
pub use tradebook_parser::{load_tradebooks, parse_tradebook};
pub use trades_model::*;

#[cfg(test)]
mod trades_model_tests;
