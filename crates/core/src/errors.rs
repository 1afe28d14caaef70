//! Core error types for the fund valuation engine.
//!
//! Valuation failures are terminal for a run: the engine never returns a
//! partially computed series alongside an error.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Tradebook error: {0}")]
    Tradebook(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Errors raised by the valuation engine itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// A trade references a ticker that has no column in the price table.
    /// Ticker eligibility is an upstream contract; the engine refuses to drop
    /// the trade silently.
    #[error("Trade on {date} references ticker '{ticker}' which is missing from the price table")]
    Configuration { ticker: String, date: NaiveDate },

    /// Holdings or units are inconsistent with the trade ledger.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// A denominator the model requires to be nonzero was zero.
    #[error("Computation failed: {0}")]
    Computation(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Validation(ValidationError::Csv(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Tradebook(err.to_string())
    }
}
