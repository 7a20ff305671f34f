//! Broker REST Port (Driven Port)
//!
//! Interface for the request/response side of the broker API: opening a
//! session and fetching a one-off quote snapshot.

use async_trait::async_trait;

use crate::domain::session::ApiCredential;
use crate::domain::streaming::QuotePush;

/// Errors from the broker REST API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerApiError {
    /// Transport failure talking to the broker.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// The broker rejected the credential.
    #[error("Broker authentication failed: {message}")]
    AuthenticationFailed {
        /// Error details.
        message: String,
    },

    /// The broker answered with a non-success status or result code.
    #[error("Broker API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error details.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid broker response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

/// Port for opening a broker session.
#[async_trait]
pub trait LoginPort: Send + Sync {
    /// Exchange the credential for a fresh session token.
    async fn login(&self, credential: &ApiCredential) -> Result<String, BrokerApiError>;
}

/// Port for privileged one-off quote requests.
#[async_trait]
pub trait QuotePort: Send + Sync {
    /// Fetch the current board for `symbol` on `exchange` using `token`.
    async fn quote(
        &self,
        token: &str,
        symbol: &str,
        exchange: i32,
    ) -> Result<QuotePush, BrokerApiError>;
}
