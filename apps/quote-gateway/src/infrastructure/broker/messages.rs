//! Broker Wire Message Types
//!
//! Serde types for the broker's REST and push JSON payloads. Field names
//! follow the broker's PascalCase schema.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Session
// =============================================================================

/// Body of `POST /token`.
#[derive(Clone, Serialize)]
pub struct TokenRequest<'a> {
    /// API password.
    #[serde(rename = "APIPassword")]
    pub api_password: &'a str,
}

/// Response of `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Zero on success.
    #[serde(rename = "ResultCode")]
    pub result_code: i32,
    /// Issued token.
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
}

/// Error body returned with non-success HTTP statuses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    /// Broker error code.
    #[serde(rename = "Code")]
    pub code: i64,
    /// Human-readable message.
    #[serde(rename = "Message", default)]
    pub message: String,
}

// =============================================================================
// Board (quote snapshot and push)
// =============================================================================

/// Board snapshot, returned by `GET /board/{symbol}@{exchange}` and pushed
/// over the WebSocket.
///
/// Only the fields the gateway forwards are decoded; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoardMessage {
    /// Symbol code.
    pub symbol: String,
    /// Issue name.
    #[serde(default)]
    pub symbol_name: String,
    /// Exchange code.
    #[serde(default)]
    pub exchange: i32,
    /// Last traded price.
    #[serde(default)]
    pub current_price: Option<Decimal>,
    /// Time of the last price change.
    #[serde(default)]
    pub current_price_time: Option<DateTime<FixedOffset>>,
    /// Cumulative volume.
    #[serde(default)]
    pub trading_volume: Option<Decimal>,
    /// Best bid price.
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Best bid quantity.
    #[serde(default)]
    pub bid_qty: Option<Decimal>,
    /// Best ask price.
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    /// Best ask quantity.
    #[serde(default)]
    pub ask_qty: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_request_uses_broker_field_name() {
        let json = serde_json::to_string(&TokenRequest { api_password: "pw" }).unwrap();
        assert_eq!(json, r#"{"APIPassword":"pw"}"#);
    }

    #[test]
    fn token_response_without_token() {
        let resp: TokenResponse = serde_json::from_str(r#"{"ResultCode":4001009}"#).unwrap();
        assert_eq!(resp.result_code, 4_001_009);
        assert!(resp.token.is_none());
    }

    #[test]
    fn board_ignores_unknown_fields() {
        let json = r#"{
            "Symbol": "5401",
            "SymbolName": "Nippon Steel",
            "Exchange": 1,
            "CurrentPrice": 2408,
            "CurrentPriceTime": "2022-04-04T15:00:00+09:00",
            "TradingVolume": 1234500,
            "VWAP": 2405.1,
            "BidPrice": 2408.5,
            "BidQty": 4800,
            "Sell1": {"Price": 2408.5, "Qty": 4800}
        }"#;
        let board: BoardMessage = serde_json::from_str(json).unwrap();

        assert_eq!(board.symbol, "5401");
        assert_eq!(board.current_price, Some(Decimal::new(2408, 0)));
        assert_eq!(board.bid_price, Some(Decimal::new(24085, 1)));
        assert!(board.ask_price.is_none());
        assert!(board.current_price_time.is_some());
    }
}
