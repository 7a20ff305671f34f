//! Push Connection Port (Driven Port)
//!
//! Interface for the broker's server-push channel. The connection delivers
//! every inbound quote to a single registered [`PushHandler`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::streaming::{QuotePush, StreamError};

/// Errors from the push connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    /// Failed to establish the connection.
    #[error("Push connection failed: {0}")]
    ConnectionFailed(String),

    /// The connection dropped or failed after being established.
    #[error("Push connection lost: {0}")]
    ConnectionLost(String),

    /// Close was requested but the connection was not open.
    #[error("Push connection is not open")]
    NotConnected,
}

/// Receiver of inbound push messages.
#[async_trait]
pub trait PushHandler: Send + Sync {
    /// Handle one pushed quote.
    async fn on_push(&self, quote: QuotePush) -> Result<(), StreamError>;
}

/// The broker's push channel.
///
/// `open` runs for the lifetime of the connection: it returns `Ok(())` when
/// the link was closed cleanly (for example by [`PushConnection::close`]) and
/// an error when it could not be established or failed.
#[async_trait]
pub trait PushConnection: Send + Sync {
    /// Whether the connection is currently open.
    fn is_opened(&self) -> bool;

    /// Register the handler that receives every inbound message.
    fn set_handler(&self, handler: Arc<dyn PushHandler>);

    /// Establish the connection and serve it until it ends.
    async fn open(&self) -> Result<(), PushError>;

    /// Request the connection to close.
    async fn close(&self) -> Result<(), PushError>;
}
