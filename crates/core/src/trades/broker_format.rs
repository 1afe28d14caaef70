use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column layout of a Zerodha (Console) tradebook export.
pub const ZERODHA_COLUMNS: [&str; 13] = [
    "symbol",
    "isin",
    "trade_date",
    "exchange",
    "segment",
    "series",
    "trade_type",
    "auction",
    "quantity",
    "price",
    "trade_id",
    "order_id",
    "order_execution_time",
];

/// Broker export formats the ingester recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrokerFormat {
    Zerodha,
}

impl BrokerFormat {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            BrokerFormat::Zerodha => &ZERODHA_COLUMNS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BrokerFormat::Zerodha => "Zerodha",
        }
    }

    /// Identifies the broker from a header row. Column order is ignored but
    /// the set of columns must match exactly.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<BrokerFormat> {
        let found: HashSet<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();
        [BrokerFormat::Zerodha].into_iter().find(|format| {
            let expected: HashSet<&str> = format.columns().iter().copied().collect();
            found == expected
        })
    }
}
