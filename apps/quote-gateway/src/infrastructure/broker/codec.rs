//! Board Codec
//!
//! Decodes broker board JSON into [`QuotePush`] domain values.

use chrono::Utc;
use rust_decimal::Decimal;

use super::messages::BoardMessage;
use crate::domain::streaming::QuotePush;

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally valid JSON that is not a usable board.
    #[error("invalid message format: {0}")]
    InvalidFormat(String),
}

/// JSON codec for board payloads.
#[derive(Debug, Default, Clone)]
pub struct BoardCodec;

impl BoardCodec {
    /// Create a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode one board JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object or carries no symbol.
    pub fn decode(&self, text: &str) -> Result<QuotePush, CodecError> {
        let trimmed = text.trim();
        if !trimmed.starts_with('{') {
            let preview: String = trimmed.chars().take(50).collect();
            return Err(CodecError::InvalidFormat(format!(
                "expected JSON object, got: {preview}..."
            )));
        }

        let board: BoardMessage = serde_json::from_str(trimmed)?;
        Self::to_quote(board)
    }

    /// Convert a decoded board to a quote.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidFormat`] when the symbol is empty.
    pub fn to_quote(board: BoardMessage) -> Result<QuotePush, CodecError> {
        if board.symbol.is_empty() {
            return Err(CodecError::InvalidFormat("board without symbol".to_string()));
        }

        Ok(QuotePush {
            symbol: board.symbol,
            exchange: board.exchange,
            symbol_name: board.symbol_name,
            last_price: board.current_price,
            bid_price: board.bid_price,
            bid_qty: board.bid_qty.unwrap_or(Decimal::ZERO),
            ask_price: board.ask_price,
            ask_qty: board.ask_qty.unwrap_or(Decimal::ZERO),
            trading_volume: board.trading_volume.unwrap_or(Decimal::ZERO),
            timestamp: board.current_price_time.map(|t| t.with_timezone(&Utc)),
        })
    }
}
