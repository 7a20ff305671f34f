//! Metrics Exposition Tests
//!
//! Renders the Prometheus handle while streams come and go. Lives in its own
//! test binary so the global recorder only sees the streams opened here.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};
use rust_decimal::Decimal;
use tokio::time::timeout;
use tonic::Request;

use quote_gateway::{
    ApiCredential, BrokerApiError, Clock, ConsumerRegistry, LoginPort, PushConnection, PushError,
    PushHandler, QuoteGatewayServer, QuotePort, QuotePush, SessionManager, StreamBroadcaster,
    TokenCache, init_metrics,
    proto::{StreamQuotesRequest, quote_gateway_service_server::QuoteGatewayService},
};

/// Push connection that is already up and never ends on its own.
struct OpenPush;

#[async_trait]
impl PushConnection for OpenPush {
    fn is_opened(&self) -> bool {
        true
    }

    fn set_handler(&self, _handler: Arc<dyn PushHandler>) {}

    async fn open(&self) -> Result<(), PushError> {
        std::future::pending().await
    }

    async fn close(&self) -> Result<(), PushError> {
        Ok(())
    }
}

struct StaticBroker;

#[async_trait]
impl LoginPort for StaticBroker {
    async fn login(&self, _credential: &ApiCredential) -> Result<String, BrokerApiError> {
        Ok("tok-1".to_string())
    }
}

#[async_trait]
impl QuotePort for StaticBroker {
    async fn quote(
        &self,
        _token: &str,
        symbol: &str,
        exchange: i32,
    ) -> Result<QuotePush, BrokerApiError> {
        Ok(quote(symbol, exchange))
    }
}

struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

fn quote(symbol: &str, exchange: i32) -> QuotePush {
    QuotePush {
        symbol: symbol.to_string(),
        exchange,
        symbol_name: format!("Issue {symbol}"),
        last_price: Some(Decimal::new(25_005, 1)),
        bid_price: None,
        bid_qty: Decimal::ZERO,
        ask_price: None,
        ask_qty: Decimal::ZERO,
        trading_volume: Decimal::new(100, 0),
        timestamp: None,
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn consumer_gauge_tracks_open_streams() {
    let handle = init_metrics().unwrap();

    let broadcaster = StreamBroadcaster::new(Arc::new(ConsumerRegistry::new()), Arc::new(OpenPush));
    let session = Arc::new(SessionManager::new(
        Arc::new(TokenCache::new()),
        Arc::new(LocalClock),
        Arc::new(StaticBroker),
        ApiCredential::new("secret"),
    ));
    let server = QuoteGatewayServer::new(session, Arc::new(StaticBroker), broadcaster.clone());

    let request = || {
        Request::new(StreamQuotesRequest {
            symbols: Vec::new(),
        })
    };
    let first = server.stream_quotes(request()).await.unwrap().into_inner();
    let _second = server.stream_quotes(request()).await.unwrap().into_inner();
    wait_until(|| broadcaster.consumer_count() == 2).await;

    assert!(handle.render().contains("quote_gateway_consumers 2"));

    // The hang-up is noticed on the next push.
    drop(first);
    broadcaster.on_push(quote("7203", 1)).await.unwrap();
    wait_until(|| handle.render().contains("quote_gateway_consumers 1")).await;
    assert_eq!(broadcaster.consumer_count(), 1);
    assert!(
        handle
            .render()
            .contains("quote_gateway_consumers_detached_total{reason=\"delivery_failed\"} 1")
    );
}
