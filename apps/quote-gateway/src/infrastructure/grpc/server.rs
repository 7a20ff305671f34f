//! gRPC Gateway Server Implementation
//!
//! Implements the `QuoteGatewayService` gRPC service on top of the session
//! manager, the REST quote port and the stream broadcaster.

use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use super::proto::quote_gateway::v1::{
    self as proto, GetQuoteRequest, GetQuoteResponse, GetSessionStatusRequest,
    GetSessionStatusResponse, RefreshSessionRequest, RefreshSessionResponse, StreamQuotesRequest,
    StreamQuotesResponse, quote_gateway_service_server::QuoteGatewayService,
};
use super::sink::GrpcQuoteSink;
use crate::application::ports::QuotePort;
use crate::application::services::{SessionManager, StreamBroadcaster};
use crate::domain::streaming::{LinkState, QuotePush};
use crate::infrastructure::metrics;

// =============================================================================
// Type Aliases
// =============================================================================

type RpcResult<T> = Result<Response<T>, Status>;
type BoxedStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

/// Default per-client response buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

// =============================================================================
// Server Implementation
// =============================================================================

/// gRPC server for quotes and session control.
pub struct QuoteGatewayServer {
    session: Arc<SessionManager>,
    quotes: Arc<dyn QuotePort>,
    broadcaster: StreamBroadcaster,
    buffer_size: usize,
}

impl QuoteGatewayServer {
    /// Create a new gateway server.
    #[must_use]
    pub fn new(
        session: Arc<SessionManager>,
        quotes: Arc<dyn QuotePort>,
        broadcaster: StreamBroadcaster,
    ) -> Self {
        Self {
            session,
            quotes,
            broadcaster,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the per-client response buffer. A client that falls this far
    /// behind is detached.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}

#[tonic::async_trait]
impl QuoteGatewayService for QuoteGatewayServer {
    type StreamQuotesStream = BoxedStream<StreamQuotesResponse>;

    async fn stream_quotes(
        &self,
        request: Request<StreamQuotesRequest>,
    ) -> RpcResult<Self::StreamQuotesStream> {
        let req = request.into_inner();
        let consumer_id = uuid::Uuid::new_v4();

        tracing::info!(
            consumer_id = %consumer_id,
            symbols = req.symbols.len(),
            "StreamQuotes opened"
        );

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let sink = Arc::new(GrpcQuoteSink::new(tx.clone(), req.symbols));
        let broadcaster = self.broadcaster.clone();

        metrics::record_consumer_attached();
        tokio::spawn(async move {
            let outcome = broadcaster.attach(sink).await;
            metrics::record_consumer_detached(&outcome);

            match outcome {
                Ok(()) => {
                    tracing::info!(consumer_id = %consumer_id, "StreamQuotes ended");
                }
                Err(e) => {
                    tracing::warn!(consumer_id = %consumer_id, error = %e, "StreamQuotes failed");
                    // The client may already be gone; nothing else to do then.
                    let _ = tx.send(Err(Status::unavailable(e.to_string()))).await;
                }
            }
        });

        let stream = ReceiverStream::new(rx);
        Ok(Response::new(Box::pin(stream) as Self::StreamQuotesStream))
    }

    async fn get_quote(&self, request: Request<GetQuoteRequest>) -> RpcResult<GetQuoteResponse> {
        let req = request.into_inner();
        validate_quote_request(&req)?;

        let token = self
            .session
            .get_token()
            .await
            .map_err(|e| Status::unauthenticated(e.to_string()))?;

        let quote = self
            .quotes
            .quote(&token, &req.symbol, req.exchange)
            .await
            .map_err(|e| {
                tracing::warn!(symbol = %req.symbol, error = %e, "Quote request failed");
                Status::unavailable(e.to_string())
            })?;

        Ok(Response::new(GetQuoteResponse {
            quote: Some(quote_to_proto(&quote)),
        }))
    }

    async fn get_session_status(
        &self,
        _request: Request<GetSessionStatusRequest>,
    ) -> RpcResult<GetSessionStatusResponse> {
        let consumers = self.broadcaster.consumer_count();

        Ok(Response::new(GetSessionStatusResponse {
            has_token: self.session.has_valid_token(),
            expires_at: self.session.expires_at().map(datetime_to_timestamp),
            link_state: link_state_to_proto(self.broadcaster.link_state()).into(),
            consumers: u32::try_from(consumers).unwrap_or(u32::MAX),
        }))
    }

    async fn refresh_session(
        &self,
        _request: Request<RefreshSessionRequest>,
    ) -> RpcResult<RefreshSessionResponse> {
        self.session
            .refresh()
            .await
            .map_err(|e| Status::unauthenticated(e.to_string()))?;

        tracing::info!("Session refreshed on request");

        Ok(Response::new(RefreshSessionResponse {
            expires_at: self.session.expires_at().map(datetime_to_timestamp),
        }))
    }
}

// =============================================================================
// Validation
// =============================================================================

fn validate_quote_request(req: &GetQuoteRequest) -> Result<(), Status> {
    if req.symbol.is_empty() {
        return Err(Status::invalid_argument("symbol is required"));
    }
    if !req.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Status::invalid_argument(format!(
            "invalid symbol: {}",
            req.symbol
        )));
    }
    if req.exchange <= 0 {
        return Err(Status::invalid_argument(format!(
            "invalid exchange: {}",
            req.exchange
        )));
    }
    Ok(())
}

// =============================================================================
// Conversion Helpers
// =============================================================================

fn datetime_to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: i32::try_from(dt.timestamp_subsec_nanos()).unwrap_or(i32::MAX),
    }
}

fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

const fn link_state_to_proto(state: LinkState) -> proto::LinkState {
    match state {
        LinkState::Disconnected => proto::LinkState::Disconnected,
        LinkState::Connecting => proto::LinkState::Connecting,
        LinkState::Connected => proto::LinkState::Connected,
    }
}

pub(crate) fn quote_to_proto(quote: &QuotePush) -> proto::Quote {
    proto::Quote {
        symbol: quote.symbol.clone(),
        exchange: quote.exchange,
        symbol_name: quote.symbol_name.clone(),
        last_price: quote.last_price.map(decimal_to_f64),
        bid_price: quote.bid_price.map(decimal_to_f64),
        bid_qty: decimal_to_f64(quote.bid_qty),
        ask_price: quote.ask_price.map(decimal_to_f64),
        ask_qty: decimal_to_f64(quote.ask_qty),
        trading_volume: decimal_to_f64(quote.trading_volume),
        timestamp: quote.timestamp.map(datetime_to_timestamp),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use tokio_stream::StreamExt;

    use super::*;
    use crate::application::ports::{
        BrokerApiError, LoginPort, MockClock, PushConnection, PushError, PushHandler,
    };
    use crate::application::services::ConsumerRegistry;
    use crate::domain::session::{ApiCredential, TokenCache, session_cutoff};

    struct FixedLogin {
        calls: AtomicUsize,
        result: Result<String, BrokerApiError>,
    }

    #[async_trait]
    impl LoginPort for FixedLogin {
        async fn login(&self, _credential: &ApiCredential) -> Result<String, BrokerApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct StaticQuotes {
        result: Result<QuotePush, BrokerApiError>,
    }

    #[async_trait]
    impl QuotePort for StaticQuotes {
        async fn quote(
            &self,
            token: &str,
            symbol: &str,
            exchange: i32,
        ) -> Result<QuotePush, BrokerApiError> {
            assert_eq!(token, "tok-1");
            let mut quote = self.result.clone()?;
            quote.symbol = symbol.to_string();
            quote.exchange = exchange;
            Ok(quote)
        }
    }

    /// Push connection whose connect attempts always fail.
    struct RefusingConnection;

    #[async_trait]
    impl PushConnection for RefusingConnection {
        fn is_opened(&self) -> bool {
            false
        }

        fn set_handler(&self, _handler: Arc<dyn PushHandler>) {}

        async fn open(&self) -> Result<(), PushError> {
            Err(PushError::ConnectionFailed("connection refused".to_string()))
        }

        async fn close(&self) -> Result<(), PushError> {
            Err(PushError::NotConnected)
        }
    }

    fn sample_quote() -> QuotePush {
        QuotePush {
            symbol: String::new(),
            exchange: 0,
            symbol_name: "Toyota".to_string(),
            last_price: Some(Decimal::new(25_005, 1)),
            bid_price: Some(Decimal::new(25_000, 1)),
            bid_qty: Decimal::new(300, 0),
            ask_price: None,
            ask_qty: Decimal::ZERO,
            trading_volume: Decimal::new(1_200_000, 0),
            timestamp: Some(Utc.with_ymd_and_hms(2026, 3, 2, 0, 15, 0).unwrap()),
        }
    }

    fn server_with(
        login: Result<String, BrokerApiError>,
        quotes: Result<QuotePush, BrokerApiError>,
    ) -> (QuoteGatewayServer, Arc<FixedLogin>) {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tokyo.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now);
        clock
            .expect_session_expiry()
            .returning(|now| session_cutoff(now));

        let login = Arc::new(FixedLogin {
            calls: AtomicUsize::new(0),
            result: login,
        });
        let session = Arc::new(SessionManager::new(
            Arc::new(TokenCache::new()),
            Arc::new(clock),
            login.clone(),
            ApiCredential::new("secret"),
        ));
        let broadcaster = StreamBroadcaster::new(
            Arc::new(ConsumerRegistry::new()),
            Arc::new(RefusingConnection),
        );
        let server = QuoteGatewayServer::new(
            session,
            Arc::new(StaticQuotes { result: quotes }),
            broadcaster,
        );
        (server, login)
    }

    fn ok_server() -> (QuoteGatewayServer, Arc<FixedLogin>) {
        server_with(Ok("tok-1".to_string()), Ok(sample_quote()))
    }

    #[tokio::test]
    async fn get_quote_logs_in_and_converts() {
        let (server, login) = ok_server();

        let response = server
            .get_quote(Request::new(GetQuoteRequest {
                symbol: "7203".to_string(),
                exchange: 1,
            }))
            .await
            .unwrap()
            .into_inner();

        let quote = response.quote.unwrap();
        assert_eq!(quote.symbol, "7203");
        assert_eq!(quote.exchange, 1);
        assert_eq!(quote.last_price, Some(2500.5));
        assert_eq!(quote.ask_price, None);
        assert!(quote.timestamp.is_some());
        assert_eq!(login.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn get_quote_rejects_bad_symbols() {
        let (server, login) = ok_server();

        for (symbol, exchange) in [("", 1), ("72 03", 1), ("7203;", 1), ("7203", 0)] {
            let status = server
                .get_quote(Request::new(GetQuoteRequest {
                    symbol: symbol.to_string(),
                    exchange,
                }))
                .await
                .unwrap_err();
            assert_eq!(status.code(), tonic::Code::InvalidArgument, "{symbol}");
        }
        assert_eq!(login.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_quote_login_failure_is_unauthenticated() {
        let (server, _) = server_with(
            Err(BrokerApiError::AuthenticationFailed {
                message: "bad password".to_string(),
            }),
            Ok(sample_quote()),
        );

        let status = server
            .get_quote(Request::new(GetQuoteRequest {
                symbol: "7203".to_string(),
                exchange: 1,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert!(status.message().contains("bad password"));
    }

    #[tokio::test]
    async fn get_quote_upstream_failure_is_unavailable() {
        let (server, _) = server_with(
            Ok("tok-1".to_string()),
            Err(BrokerApiError::Api {
                status: 500,
                message: "board unavailable".to_string(),
            }),
        );

        let status = server
            .get_quote(Request::new(GetQuoteRequest {
                symbol: "7203".to_string(),
                exchange: 1,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unavailable);
    }

    #[tokio::test]
    async fn session_status_before_and_after_refresh() {
        let (server, login) = ok_server();

        let before = server
            .get_session_status(Request::new(GetSessionStatusRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert!(!before.has_token);
        assert!(before.expires_at.is_none());
        assert_eq!(before.link_state, i32::from(proto::LinkState::Disconnected));
        assert_eq!(before.consumers, 0);

        let refreshed = server
            .refresh_session(Request::new(RefreshSessionRequest {}))
            .await
            .unwrap()
            .into_inner();
        // 09:00 +09:00 is past the 06:30 cutoff, so the next one is tomorrow.
        let expected = Utc.with_ymd_and_hms(2026, 3, 2, 21, 30, 0).unwrap();
        assert_eq!(
            refreshed.expires_at,
            Some(datetime_to_timestamp(expected))
        );

        let after = server
            .get_session_status(Request::new(GetSessionStatusRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert!(after.has_token);
        assert_eq!(login.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_failure_is_unauthenticated() {
        let (server, _) = server_with(
            Err(BrokerApiError::ConnectionError {
                message: "timed out".to_string(),
            }),
            Ok(sample_quote()),
        );

        let status = server
            .refresh_session(Request::new(RefreshSessionRequest {}))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[tokio::test]
    async fn stream_ends_unavailable_when_upstream_refuses() {
        let (server, _) = ok_server();

        let mut stream = server
            .stream_quotes(Request::new(StreamQuotesRequest {
                symbols: vec!["7203".to_string()],
            }))
            .await
            .unwrap()
            .into_inner();

        let status = stream.next().await.unwrap().unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert!(status.message().contains("connection refused"));
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn datetime_conversion() {
        let dt = Utc::now();
        let ts = datetime_to_timestamp(dt);
        let expected_nanos = i32::try_from(dt.timestamp_subsec_nanos()).unwrap_or(i32::MAX);

        assert_eq!(ts.seconds, dt.timestamp());
        assert_eq!(ts.nanos, expected_nanos);
    }

    #[test]
    fn decimal_conversion() {
        let d = Decimal::new(12345, 2);
        let f = decimal_to_f64(d);
        assert!((f - 123.45).abs() < 0.001);
    }

    #[test]
    fn link_state_mapping() {
        assert_eq!(
            link_state_to_proto(LinkState::Disconnected),
            proto::LinkState::Disconnected
        );
        assert_eq!(
            link_state_to_proto(LinkState::Connecting),
            proto::LinkState::Connecting
        );
        assert_eq!(
            link_state_to_proto(LinkState::Connected),
            proto::LinkState::Connected
        );
    }
}
