//! Quote Sink Port (Driven Port)
//!
//! One downstream consumer's outbound message channel.

use async_trait::async_trait;

use crate::domain::streaming::{QuotePush, StreamError};

/// Outbound channel of one streaming consumer.
#[async_trait]
pub trait QuoteSink: Send + Sync {
    /// Forward one quote. An error detaches the consumer.
    async fn send(&self, quote: &QuotePush) -> Result<(), StreamError>;
}
