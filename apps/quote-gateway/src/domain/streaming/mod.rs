//! Quote Streaming Types
//!
//! Core domain types for the real-time quote feed: the pushed quote itself,
//! the error a streaming consumer can terminate with, and the reported state
//! of the shared upstream link.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A real-time quote pushed by the broker for one listed symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePush {
    /// Symbol code (e.g. "7203").
    pub symbol: String,
    /// Exchange code the quote belongs to.
    pub exchange: i32,
    /// Display name of the issue.
    pub symbol_name: String,
    /// Last traded price, if any trade happened.
    pub last_price: Option<Decimal>,
    /// Best bid price.
    pub bid_price: Option<Decimal>,
    /// Best bid quantity.
    pub bid_qty: Decimal,
    /// Best ask price.
    pub ask_price: Option<Decimal>,
    /// Best ask quantity.
    pub ask_qty: Decimal,
    /// Cumulative traded volume for the session.
    pub trading_volume: Decimal,
    /// Time of the last price change, as reported upstream.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Terminal error of one streaming consumer.
///
/// `Clone` because a single upstream connect failure is delivered to every
/// consumer waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The shared upstream push link could not be established or failed.
    #[error("upstream push connection failed: {0}")]
    Connect(String),

    /// Forwarding a message to this consumer failed.
    #[error("delivery to consumer failed: {0}")]
    Delivery(String),

    /// The registry went away before the consumer was detached.
    #[error("stream closed before completion")]
    Closed,
}

/// Reported state of the shared upstream push link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// No connection and no attempt in flight.
    #[default]
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// The push connection is open.
    Connected,
}

impl LinkState {
    /// Get the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_messages() {
        assert_eq!(
            StreamError::Connect("refused".to_string()).to_string(),
            "upstream push connection failed: refused"
        );
        assert_eq!(
            StreamError::Delivery("client gone".to_string()).to_string(),
            "delivery to consumer failed: client gone"
        );
    }

    #[test]
    fn link_state_names() {
        assert_eq!(LinkState::default(), LinkState::Disconnected);
        assert_eq!(LinkState::Connecting.as_str(), "connecting");
        assert_eq!(LinkState::Connected.as_str(), "connected");
    }
}
