//! Tests for trade ledger models.

#[cfg(test)]
mod tests {
    use crate::trades::{TradeEvent, TradeLedger, TradeType};
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_trade_type_parsing() {
        assert_eq!(TradeType::from_str("BUY").unwrap(), TradeType::Buy);
        assert_eq!(TradeType::from_str(" sell ").unwrap(), TradeType::Sell);
        assert!(TradeType::from_str("short").is_err());
    }

    #[test]
    fn test_sell_is_negative_quantity() {
        let trade = TradeEvent::new(date(2021, 12, 1), "AAPL", TradeType::Sell, dec!(5), dec!(155)).unwrap();
        assert_eq!(trade.signed_quantity, dec!(-5));
        assert_eq!(trade.trade_type(), TradeType::Sell);
        assert_eq!(trade.notional(), dec!(-775));
    }

    #[test]
    fn test_rejects_non_positive_quantity_and_negative_price() {
        assert!(TradeEvent::new(date(2021, 12, 1), "AAPL", TradeType::Buy, dec!(0), dec!(1)).is_err());
        assert!(TradeEvent::new(date(2021, 12, 1), "AAPL", TradeType::Buy, dec!(-1), dec!(1)).is_err());
        assert!(TradeEvent::new(date(2021, 12, 1), "AAPL", TradeType::Buy, dec!(1), dec!(-1)).is_err());
        assert!(TradeEvent::new(date(2021, 12, 1), " ", TradeType::Buy, dec!(1), dec!(1)).is_err());
    }

    #[test]
    fn test_ledger_sorts_by_date_then_execution_time() {
        let d = date(2021, 12, 1);
        let late = TradeEvent::new(d, "MSFT", TradeType::Buy, dec!(1), dec!(200))
            .unwrap()
            .with_execution_time(at("2021-12-01 15:00:00"));
        let early = TradeEvent::new(d, "AAPL", TradeType::Buy, dec!(1), dec!(150))
            .unwrap()
            .with_execution_time(at("2021-12-01 09:30:00"));
        let previous_day = TradeEvent::new(date(2021, 11, 30), "AAPL", TradeType::Buy, dec!(1), dec!(149)).unwrap();

        let ledger = TradeLedger::new(vec![late, early, previous_day]);
        let tickers: Vec<&str> = ledger.events().iter().map(|e| e.ticker.as_str()).collect();

        assert_eq!(tickers, vec!["AAPL", "AAPL", "MSFT"]);
        assert_eq!(ledger.first_date(), Some(date(2021, 11, 30)));
        assert_eq!(ledger.last_date(), Some(d));
    }

    #[test]
    fn test_ledger_sort_is_stable_without_timestamps() {
        let d = date(2021, 12, 1);
        let first = TradeEvent::new(d, "AAPL", TradeType::Buy, dec!(1), dec!(150)).unwrap();
        let second = TradeEvent::new(d, "AAPL", TradeType::Sell, dec!(1), dec!(151)).unwrap();
        let ledger = TradeLedger::new(vec![first.clone(), second.clone()]);
        assert_eq!(ledger.events(), &[first, second]);
    }

    #[test]
    fn test_ledger_window_and_ticker_filter() {
        let ledger: TradeLedger = vec![
            TradeEvent::new(date(2021, 11, 29), "AAPL", TradeType::Buy, dec!(10), dec!(150)).unwrap(),
            TradeEvent::new(date(2021, 11, 30), "MSFT", TradeType::Buy, dec!(5), dec!(200)).unwrap(),
            TradeEvent::new(date(2021, 12, 3), "MSFT", TradeType::Sell, dec!(5), dec!(208)).unwrap(),
        ]
        .into_iter()
        .collect();

        let window = ledger.within(Some(date(2021, 11, 30)), Some(date(2021, 12, 2)));
        assert_eq!(window.len(), 1);
        assert_eq!(window.events()[0].ticker, "MSFT");

        let open_ended = ledger.within(Some(date(2021, 11, 30)), None);
        assert_eq!(open_ended.len(), 2);

        let only_aapl = ledger.retain_tickers(&BTreeSet::from(["AAPL".to_string()]));
        assert_eq!(only_aapl.len(), 1);
        assert_eq!(ledger.tickers().len(), 2);
    }

    #[test]
    fn test_trade_event_serialization() {
        let trade = TradeEvent::new(date(2021, 11, 29), "AAPL", TradeType::Buy, dec!(10), dec!(150)).unwrap();
        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["ticker"], "AAPL");
        assert_eq!(json["date"], "2021-11-29");
        assert!(json.get("signedQuantity").is_some());
    }

    #[test]
    fn test_deserialized_trade_is_validated() {
        let ok: TradeEvent = serde_json::from_str(
            r#"{"date":"2021-11-30","ticker":"AAPL","signedQuantity":-5,"price":155,"tradeId":"T1"}"#,
        )
        .unwrap();
        assert_eq!(ok.trade_type(), TradeType::Sell);
        assert_eq!(ok.signed_quantity, dec!(-5));
        assert_eq!(ok.trade_id.as_deref(), Some("T1"));

        let zero_qty = r#"{"date":"2021-11-30","ticker":"AAPL","signedQuantity":0,"price":155}"#;
        assert!(serde_json::from_str::<TradeEvent>(zero_qty).is_err());
        let negative_price = r#"{"date":"2021-11-30","ticker":"AAPL","signedQuantity":5,"price":-1}"#;
        assert!(serde_json::from_str::<TradeEvent>(negative_price).is_err());
        let blank_ticker = r#"{"date":"2021-11-30","ticker":" ","signedQuantity":5,"price":1}"#;
        assert!(serde_json::from_str::<TradeEvent>(blank_ticker).is_err());
    }

    #[test]
    fn test_deserialized_ledger_is_sorted() {
        let ledger: TradeLedger = serde_json::from_str(
            r#"{"events":[
                {"date":"2021-12-02","ticker":"MSFT","signedQuantity":1,"price":300},
                {"date":"2021-11-29","ticker":"AAPL","signedQuantity":2,"price":150}
            ]}"#,
        )
        .unwrap();
        assert_eq!(ledger.first_date(), Some(date(2021, 11, 29)));
        assert_eq!(ledger.events()[1].ticker, "MSFT");
    }
}
