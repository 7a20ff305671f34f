//! Broker REST Client
//!
//! HTTP adapter for the broker's request/response API. Implements
//! [`LoginPort`] (`POST /token`) and [`QuotePort`]
//! (`GET /board/{symbol}@{exchange}`).
//!
//! Nothing is retried here: a failed call is reported to the caller, and the
//! session manager's next request naturally tries again.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::codec::BoardCodec;
use super::messages::{BoardMessage, ErrorResponse, TokenRequest, TokenResponse};
use crate::application::ports::{BrokerApiError, LoginPort, QuotePort};
use crate::domain::session::ApiCredential;
use crate::domain::streaming::QuotePush;
use crate::infrastructure::config::BrokerSettings;
use crate::infrastructure::metrics::{self, Outcome};

/// Header carrying the session token on privileged calls.
pub const TOKEN_HEADER: &str = "X-API-KEY";

/// HTTP client for the broker REST API.
#[derive(Debug, Clone)]
pub struct BrokerRestClient {
    client: Client,
    base_url: String,
}

impl BrokerRestClient {
    /// Create a client from broker settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: &BrokerSettings) -> Result<Self, BrokerApiError> {
        Self::with_base_url(&settings.rest_url, settings.http_timeout)
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, BrokerApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerApiError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BrokerApiError> {
        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| BrokerApiError::ConnectionError {
                message: e.to_string(),
            });
        metrics::record_rest_duration(endpoint, started.elapsed());
        let response = response?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BrokerApiError::ConnectionError {
                message: e.to_string(),
            })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => format!("{} (code {})", err.message, err.code),
                Err(_) => body,
            };
            tracing::debug!(endpoint, status = status.as_u16(), %message, "Broker API error");
            return Err(BrokerApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| BrokerApiError::InvalidResponse {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl LoginPort for BrokerRestClient {
    async fn login(&self, credential: &ApiCredential) -> Result<String, BrokerApiError> {
        let request = self
            .client
            .post(format!("{}/token", self.base_url))
            .json(&TokenRequest {
                api_password: credential.expose(),
            });

        let result = self
            .send::<TokenResponse>("token", request)
            .await
            .map_err(|e| match e {
                BrokerApiError::Api { message, .. } => {
                    BrokerApiError::AuthenticationFailed { message }
                }
                other => other,
            })
            .and_then(|resp| match resp.token {
                Some(token) if resp.result_code == 0 && !token.is_empty() => Ok(token),
                _ => Err(BrokerApiError::AuthenticationFailed {
                    message: format!("ResultCode {}", resp.result_code),
                }),
            });

        metrics::record_login_attempt(Outcome::of(&result));
        result
    }
}

#[async_trait]
impl QuotePort for BrokerRestClient {
    async fn quote(
        &self,
        token: &str,
        symbol: &str,
        exchange: i32,
    ) -> Result<QuotePush, BrokerApiError> {
        let request = self
            .client
            .get(format!("{}/board/{symbol}@{exchange}", self.base_url))
            .header(TOKEN_HEADER, token);

        let board: BoardMessage = self.send("board", request).await?;
        BoardCodec::to_quote(board).map_err(|e| BrokerApiError::InvalidResponse {
            message: e.to_string(),
        })
    }
}
