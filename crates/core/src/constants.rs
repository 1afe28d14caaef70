use rust_decimal::Decimal;

/// NAV per unit struck on the first valuation date.
pub const DEFAULT_INITIAL_NAV: Decimal = Decimal::ONE_HUNDRED;

/// Decimal precision for persisted valuation output
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Suffix appended to NSE symbols so they resolve on market-data providers.
pub const NSE_TICKER_SUFFIX: &str = ".NS";
