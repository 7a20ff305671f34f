//! gRPC Quote Sink
//!
//! Adapts one `StreamQuotes` response channel to the [`QuoteSink`] port.
//!
//! Sends never wait: a client whose buffer is full is detached. A client that
//! hung up is detached on the next push, whatever its symbol.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tonic::Status;

use super::proto::quote_gateway::v1::StreamQuotesResponse;
use super::server::quote_to_proto;
use crate::application::ports::QuoteSink;
use crate::domain::streaming::{QuotePush, StreamError};
use crate::infrastructure::metrics;

/// Outbound half of a `StreamQuotes` call.
pub type ResponseSender = mpsc::Sender<Result<StreamQuotesResponse, Status>>;

/// Forwards pushed quotes into a gRPC response stream.
#[derive(Debug)]
pub struct GrpcQuoteSink {
    tx: ResponseSender,
    symbols: HashSet<String>,
}

impl GrpcQuoteSink {
    /// Create a sink. An empty symbol set forwards every quote.
    #[must_use]
    pub fn new(tx: ResponseSender, symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            tx,
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Whether the sink forwards quotes for `symbol`.
    #[must_use]
    pub fn wants(&self, symbol: &str) -> bool {
        self.symbols.is_empty() || self.symbols.contains(symbol)
    }
}

#[async_trait]
impl QuoteSink for GrpcQuoteSink {
    async fn send(&self, quote: &QuotePush) -> Result<(), StreamError> {
        if self.tx.is_closed() {
            return Err(StreamError::Delivery("client disconnected".to_string()));
        }
        if !self.wants(&quote.symbol) {
            return Ok(());
        }

        let response = StreamQuotesResponse {
            quote: Some(quote_to_proto(quote)),
        };

        match self.tx.try_send(Ok(response)) {
            Ok(()) => {
                metrics::record_push_delivered();
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                Err(StreamError::Delivery("consumer lagging".to_string()))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(StreamError::Delivery("client disconnected".to_string()))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
