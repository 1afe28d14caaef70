use std::path::Path;

use anyhow::Context;
use fundnav_core::constants::{DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION};
use fundnav_core::prices::{eligibility_against_table, parse_price_table};
use fundnav_core::trades::load_tradebooks;
use fundnav_core::{summarize, FundService, ValuationResult};
use rust_decimal::Decimal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Loads tradebooks and prices, values the fund and writes the series.
pub fn run(config: &Config) -> anyhow::Result<ValuationResult> {
    let ledger = load_tradebooks(&config.tradebook_dir, config.fund.ticker_suffix())
        .with_context(|| format!("Failed to load tradebooks from {}", config.tradebook_dir.display()))?;

    let raw_prices = std::fs::read(&config.prices_path)
        .with_context(|| format!("Failed to read {}", config.prices_path.display()))?;
    let prices = parse_price_table(&raw_prices)
        .with_context(|| format!("Failed to parse {}", config.prices_path.display()))?;
    tracing::info!(
        "Loaded {} price dates for {} tickers",
        prices.len(),
        prices.tickers().len()
    );

    let report = eligibility_against_table(&ledger, &prices);
    let ledger = report.apply(&ledger);

    let service = FundService::new(config.fund.clone())?;
    let result = service.construct(&ledger, &prices)?;

    write_valuation_csv(&result, &config.output_path)?;
    tracing::info!("Wrote {} rows to {}", result.len(), config.output_path.display());

    if !result.is_empty() {
        let summary = summarize(&result)?;
        tracing::info!(
            "{}..{}: NAV {} -> {}, return {}%, max drawdown {}%",
            summary.period_start_date,
            summary.period_end_date,
            summary.start_nav.round_dp(DISPLAY_DECIMAL_PRECISION),
            summary.end_nav.round_dp(DISPLAY_DECIMAL_PRECISION),
            percent(summary.cumulative_return),
            percent(summary.max_drawdown)
        );
        if let Some(annualized) = summary.annualized_return {
            tracing::info!("Annualized return {}%", percent(annualized));
        }
    }

    Ok(result)
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Writes `date,aum,units,nav` followed by one holdings column per ticker.
pub fn write_valuation_csv(result: &ValuationResult, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["date".to_string(), "aum".into(), "units".into(), "nav".into()];
    header.extend(result.holdings.tickers().iter().cloned());
    writer.write_record(&header)?;

    for (date_idx, point) in result.series.iter().enumerate() {
        let mut record = vec![
            point.date.format("%Y-%m-%d").to_string(),
            point.aum.round_dp(DECIMAL_PRECISION).normalize().to_string(),
            point.units.round_dp(DECIMAL_PRECISION).normalize().to_string(),
            point.nav.round_dp(DECIMAL_PRECISION).normalize().to_string(),
        ];
        record.extend(
            result
                .holdings
                .row(date_idx)
                .iter()
                .map(|q| q.round_dp(DECIMAL_PRECISION).normalize().to_string()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundnav_core::compute_valuation;
    use fundnav_core::prices::PriceTable;
    use fundnav_core::trades::{TradeEvent, TradeLedger, TradeType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_valuation_csv() {
        let d1 = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2022, 1, 4).unwrap();
        let prices = PriceTable::new(
            vec!["TCS.NS".to_string()],
            vec![(d1, vec![Some(dec!(3000))]), (d2, vec![Some(dec!(3100))])],
        )
        .unwrap();
        let ledger = TradeLedger::new(vec![
            TradeEvent::new(d1, "TCS.NS", TradeType::Buy, dec!(3), dec!(3000)).unwrap(),
        ]);
        let result = compute_valuation(&ledger, &prices, dec!(100)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valuation.csv");
        write_valuation_csv(&result, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "date,aum,units,nav,TCS.NS");
        assert_eq!(lines[1], "2022-01-03,9000,90,100,3");
        assert_eq!(lines[2], "2022-01-04,9300,90,103.333333,3");
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let books = dir.path().join("tradebooks");
        std::fs::create_dir(&books).unwrap();
        std::fs::write(
            books.join("2022.csv"),
            "symbol,isin,trade_date,exchange,segment,series,trade_type,auction,quantity,price,trade_id,order_id,order_execution_time\n\
             TCS,INE467B01029,2022-01-03,NSE,EQ,EQ,buy,false,3,3000,1,10,2022-01-03T10:00:00\n\
             WIPRO,INE075A01022,2022-01-03,NSE,EQ,EQ,buy,false,5,500,2,11,2022-01-03T10:05:00\n",
        )
        .unwrap();
        let prices_path = dir.path().join("prices.csv");
        std::fs::write(&prices_path, "date,TCS.NS\n2022-01-03,3000\n2022-01-04,3100\n").unwrap();

        let config = Config {
            tradebook_dir: books,
            prices_path,
            output_path: dir.path().join("out.csv"),
            log_format: "text".into(),
            fund: fundnav_core::FundConfig {
                ticker_suffix: Some(".NS".into()),
                ..Default::default()
            },
        };
        let result = run(&config).unwrap();

        assert_eq!(result.holdings.tickers(), ["TCS.NS".to_string()]);
        assert_eq!(result.aum_series(), vec![dec!(9000), dec!(9300)]);
        assert!(config.output_path.exists());
    }
}
