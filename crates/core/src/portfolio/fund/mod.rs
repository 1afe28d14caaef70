//! Fund construction: the entry point tying holdings, AUM and NAV together.

mod fund_model;
mod fund_service;

pub use fund_model::FundConfig;
pub use fund_service::{compute_valuation, FundService};

#[cfg(test)]
mod fund_service_tests;
