use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use fundnav_core::constants::{DEFAULT_INITIAL_NAV, NSE_TICKER_SUFFIX};
use fundnav_core::FundConfig;
use rust_decimal::Decimal;

pub struct Config {
    pub tradebook_dir: PathBuf,
    pub prices_path: PathBuf,
    pub output_path: PathBuf,
    pub log_format: String,
    pub fund: FundConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let tradebook_dir = var("FUNDNAV_TRADEBOOK_DIR").unwrap_or_else(|| "./tradebooks".into());
        let prices_path = var("FUNDNAV_PRICES_PATH").unwrap_or_else(|| "./prices.csv".into());
        let output_path = var("FUNDNAV_OUTPUT_PATH").unwrap_or_else(|| "./valuation.csv".into());
        let log_format = var("FUNDNAV_LOG_FORMAT").unwrap_or_else(|| "text".into());

        let initial_nav = match var("FUNDNAV_INITIAL_NAV") {
            Some(raw) => raw
                .trim()
                .parse::<Decimal>()
                .with_context(|| format!("Invalid FUNDNAV_INITIAL_NAV: {}", raw))?,
            None => DEFAULT_INITIAL_NAV,
        };
        let start_date = parse_date(var("FUNDNAV_START_DATE"), "FUNDNAV_START_DATE")?;
        let end_date = parse_date(var("FUNDNAV_END_DATE"), "FUNDNAV_END_DATE")?;
        // An explicitly empty suffix keeps broker symbols as-is.
        let ticker_suffix = var("FUNDNAV_TICKER_SUFFIX").unwrap_or_else(|| NSE_TICKER_SUFFIX.into());

        let fund = FundConfig {
            initial_nav,
            start_date,
            end_date,
            ticker_suffix: Some(ticker_suffix),
        };
        fund.validate()?;

        Ok(Self {
            tradebook_dir: PathBuf::from(tradebook_dir),
            prices_path: PathBuf::from(prices_path),
            output_path: PathBuf::from(output_path),
            log_format,
            fund,
        })
    }
}

fn parse_date(raw: Option<String>, key: &str) -> anyhow::Result<Option<NaiveDate>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid {}: {}", key, s))
        })
        .transpose()
}
