#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValuationError};
    use crate::portfolio::fund::{compute_valuation, FundConfig, FundService};
    use crate::prices::{DailyPrice, PriceAvailability, PriceTable};
    use crate::trades::{TradeEvent, TradeLedger, TradeType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 6, d).unwrap()
    }

    fn trade(d: u32, ticker: &str, trade_type: TradeType, qty: Decimal, price: Decimal) -> TradeEvent {
        TradeEvent::new(date(d), ticker, trade_type, qty, price).unwrap()
    }

    fn prices() -> PriceTable {
        PriceTable::new(
            vec!["INFY.NS".to_string(), "TCS.NS".to_string()],
            vec![
                (date(1), vec![Some(dec!(100)), Some(dec!(50))]),
                (date(2), vec![Some(dec!(110)), Some(dec!(50))]),
                (date(3), vec![Some(dec!(120)), Some(dec!(55))]),
                (date(6), vec![Some(dec!(90)), Some(dec!(60))]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_compute_valuation_single_buy() {
        let ledger = TradeLedger::new(vec![trade(1, "INFY.NS", TradeType::Buy, dec!(10), dec!(100))]);
        let result = compute_valuation(&ledger, &prices(), dec!(100)).unwrap();

        assert_eq!(result.aum_series(), vec![dec!(1000), dec!(1100), dec!(1200), dec!(900)]);
        assert_eq!(result.units_series(), vec![dec!(10); 4]);
        assert_eq!(result.nav_series(), vec![dec!(100), dec!(110), dec!(120), dec!(90)]);
        assert_eq!(result.holdings.column("INFY.NS").unwrap(), vec![dec!(10); 4]);
    }

    #[test]
    fn test_compute_valuation_from_deserialized_ledger() {
        let json = r#"{"events":[
            {"date":"2022-06-02","ticker":"TCS.NS","signedQuantity":20,"price":50},
            {"date":"2022-06-01","ticker":"INFY.NS","signedQuantity":10,"price":100}
        ]}"#;
        let ledger: TradeLedger = serde_json::from_str(json).unwrap();
        let result = compute_valuation(&ledger, &prices(), dec!(100)).unwrap();

        assert_eq!(result.series[0].units, dec!(10));
        // 1000 of TCS bought at the 1st's NAV of 100.
        assert_eq!(result.series[1].net_flow, dec!(1000));
        assert_eq!(result.series[1].aum, dec!(2100));
        assert_eq!(result.series[1].units, dec!(20));
    }

    #[test]
    fn test_compute_valuation_unknown_ticker_is_configuration_error() {
        let ledger = TradeLedger::new(vec![trade(1, "WIPRO.NS", TradeType::Buy, dec!(1), dec!(400))]);
        let err = compute_valuation(&ledger, &prices(), dec!(100)).unwrap_err();

        assert!(matches!(
            err,
            Error::Valuation(ValuationError::Configuration { ref ticker, .. }) if ticker == "WIPRO.NS"
        ));
    }

    #[test]
    fn test_compute_valuation_rejects_non_positive_initial_nav() {
        let ledger = TradeLedger::new(vec![trade(1, "INFY.NS", TradeType::Buy, dec!(1), dec!(100))]);
        let err = compute_valuation(&ledger, &prices(), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_fund_service_rejects_inverted_window() {
        let config = FundConfig {
            start_date: Some(date(6)),
            end_date: Some(date(1)),
            ..Default::default()
        };
        assert!(matches!(FundService::new(config), Err(Error::InvalidConfigValue(_))));
    }

    #[test]
    fn test_construct_starts_at_first_trade() {
        let ledger = TradeLedger::new(vec![trade(2, "INFY.NS", TradeType::Buy, dec!(10), dec!(110))]);
        let service = FundService::new(FundConfig::default()).unwrap();
        let result = service.construct(&ledger, &prices()).unwrap();

        assert_eq!(result.dates(), vec![date(2), date(3), date(6)]);
        assert_eq!(result.series[0].nav, dec!(100));
        assert_eq!(result.series[0].units, dec!(11));
    }

    #[test]
    fn test_construct_honours_end_date() {
        let ledger = TradeLedger::new(vec![
            trade(1, "INFY.NS", TradeType::Buy, dec!(10), dec!(100)),
            trade(6, "TCS.NS", TradeType::Buy, dec!(10), dec!(60)),
        ]);
        let config = FundConfig {
            end_date: Some(date(3)),
            initial_nav: dec!(10),
            ..Default::default()
        };
        let result = FundService::new(config).unwrap().construct(&ledger, &prices()).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.latest().unwrap().date, date(3));
        assert_eq!(result.series[0].units, dec!(100));
        assert_eq!(result.holdings.column("TCS.NS"), None);
    }

    #[test]
    fn test_construct_from_histories_drops_unavailable_tickers() {
        let mut histories = BTreeMap::new();
        histories.insert(
            "INFY.NS".to_string(),
            PriceAvailability::available(vec![
                DailyPrice::new(date(1), dec!(100)),
                DailyPrice::new(date(2), dec!(105)),
            ]),
        );
        histories.insert(
            "DELISTED.NS".to_string(),
            PriceAvailability::unavailable("symbol not found"),
        );
        let ledger = TradeLedger::new(vec![
            trade(1, "INFY.NS", TradeType::Buy, dec!(2), dec!(100)),
            trade(1, "DELISTED.NS", TradeType::Buy, dec!(5), dec!(10)),
        ]);

        let service = FundService::new(FundConfig::default()).unwrap();
        let result = service.construct_from_histories(&ledger, &histories).unwrap();

        assert_eq!(result.holdings.tickers(), ["INFY.NS".to_string()]);
        assert_eq!(result.aum_series(), vec![dec!(200), dec!(210)]);
        assert_eq!(result.nav_series(), vec![dec!(100), dec!(105)]);
    }
}
