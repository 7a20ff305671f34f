//! Push WebSocket Client
//!
//! Connects to the broker's push WebSocket, which streams a board JSON object
//! for every registered symbol whenever its quote changes.
//!
//! # Lifecycle
//!
//! [`PushClient::open`] connects and then serves the socket until it ends:
//! it returns `Ok(())` after [`PushClient::close`] and an error when the
//! connect fails, the server drops the link, or the heartbeat expires. There
//! is no reconnect loop; the broadcaster opens a new link when the next
//! consumer attaches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::codec::BoardCodec;
use super::heartbeat::{HeartbeatAction, HeartbeatConfig, HeartbeatError, HeartbeatMonitor};
use crate::application::ports::{PushConnection, PushError, PushHandler};
use crate::domain::streaming::LinkState;
use crate::infrastructure::metrics::{self, Outcome};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the push client.
#[derive(Debug, Clone)]
pub struct PushClientConfig {
    /// WebSocket URL.
    pub url: String,
    /// Heartbeat configuration.
    pub heartbeat: HeartbeatConfig,
}

impl PushClientConfig {
    /// Create a configuration with default heartbeat settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            heartbeat: HeartbeatConfig::default(),
        }
    }

    /// Override the heartbeat settings.
    #[must_use]
    pub const fn with_heartbeat(mut self, heartbeat: HeartbeatConfig) -> Self {
        self.heartbeat = heartbeat;
        self
    }
}

// =============================================================================
// Push Client
// =============================================================================

/// WebSocket client for the broker push feed.
pub struct PushClient {
    config: PushClientConfig,
    codec: BoardCodec,
    opened: AtomicBool,
    handler: RwLock<Option<Arc<dyn PushHandler>>>,
    session: Mutex<Option<CancellationToken>>,
}

impl std::fmt::Debug for PushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushClient")
            .field("url", &self.config.url)
            .field("opened", &self.is_opened())
            .finish_non_exhaustive()
    }
}

impl PushClient {
    /// Create a new push client.
    #[must_use]
    pub fn new(config: PushClientConfig) -> Self {
        Self {
            config,
            codec: BoardCodec::new(),
            opened: AtomicBool::new(false),
            handler: RwLock::new(None),
            session: Mutex::new(None),
        }
    }

    fn mark_closed(&self) {
        self.opened.store(false, Ordering::SeqCst);
        self.session.lock().take();
        metrics::set_link_state(LinkState::Disconnected);
    }

    async fn serve<S>(&self, ws: S, cancel: &CancellationToken) -> Result<(), PushError>
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin,
    {
        let (mut write, mut read) = ws.split();
        let mut heartbeat = HeartbeatMonitor::new(self.config.heartbeat);
        let mut ticker = tokio::time::interval(heartbeat.interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                _ = ticker.tick() => {
                    match heartbeat.on_tick() {
                        HeartbeatAction::Ping => {
                            write
                                .send(Message::Ping(Vec::new().into()))
                                .await
                                .map_err(|e| PushError::ConnectionLost(e.to_string()))?;
                        }
                        HeartbeatAction::Expired(silent_for) => {
                            let err = HeartbeatError::Timeout(silent_for);
                            tracing::warn!(error = %err, "Push heartbeat expired");
                            return Err(PushError::ConnectionLost(err.to_string()));
                        }
                    }
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            heartbeat.record_activity();
                            self.dispatch(&text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            heartbeat.record_activity();
                            write
                                .send(Message::Pong(data))
                                .await
                                .map_err(|e| PushError::ConnectionLost(e.to_string()))?;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Server sent close frame");
                            return Err(PushError::ConnectionLost("closed by server".to_string()));
                        }
                        Some(Ok(_)) => {
                            heartbeat.record_activity();
                        }
                        Some(Err(e)) => {
                            return Err(PushError::ConnectionLost(e.to_string()));
                        }
                        None => {
                            return Err(PushError::ConnectionLost("stream ended".to_string()));
                        }
                    }
                }
            }
        }
    }

    async fn dispatch(&self, text: &str) {
        let quote = match self.codec.decode(text) {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable push message");
                return;
            }
        };
        metrics::record_push_received();

        let handler = self.handler.read().clone();
        let Some(handler) = handler else {
            tracing::debug!(symbol = %quote.symbol, "No push handler registered");
            return;
        };

        if let Err(e) = handler.on_push(quote).await {
            tracing::warn!(error = %e, "Push handler failed");
        }
    }
}

#[async_trait]
impl PushConnection for PushClient {
    fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    fn set_handler(&self, handler: Arc<dyn PushHandler>) {
        *self.handler.write() = Some(handler);
    }

    async fn open(&self) -> Result<(), PushError> {
        tracing::info!(url = %self.config.url, "Connecting to push stream");
        metrics::set_link_state(LinkState::Connecting);

        let ws = match tokio_tungstenite::connect_async(self.config.url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                metrics::record_connect_attempt(Outcome::Failure);
                metrics::set_link_state(LinkState::Disconnected);
                return Err(PushError::ConnectionFailed(e.to_string()));
            }
        };
        metrics::record_connect_attempt(Outcome::Success);

        let cancel = CancellationToken::new();
        *self.session.lock() = Some(cancel.clone());
        self.opened.store(true, Ordering::SeqCst);
        metrics::set_link_state(LinkState::Connected);
        tracing::info!("Push stream connected");

        let result = self.serve(ws, &cancel).await;
        self.mark_closed();
        result
    }

    async fn close(&self) -> Result<(), PushError> {
        let session = self.session.lock().take();
        let Some(cancel) = session else {
            return Err(PushError::NotConnected);
        };
        self.opened.store(false, Ordering::SeqCst);
        cancel.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::streaming::{QuotePush, StreamError};

    struct ChannelHandler(mpsc::UnboundedSender<QuotePush>);

    #[async_trait]
    impl PushHandler for ChannelHandler {
        async fn on_push(&self, quote: QuotePush) -> Result<(), StreamError> {
            self.0
                .send(quote)
                .map_err(|e| StreamError::Delivery(e.to_string()))
        }
    }

    /// Accepts one WebSocket client, sends `frames`, then idles until the
    /// client goes away.
    async fn serve_frames(frames: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            for frame in frames {
                ws.send(Message::Text(frame.into())).await.unwrap();
            }
            while let Some(Ok(msg)) = ws.next().await {
                if msg.is_close() {
                    break;
                }
            }
        });

        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn delivers_decoded_quotes_and_closes_cleanly() {
        let url = serve_frames(vec![
            r#"{"Symbol":"7203","Exchange":1,"CurrentPrice":2145}"#,
            "garbage",
            r#"{"Symbol":"6758","Exchange":1,"CurrentPrice":12000}"#,
        ])
        .await;

        let client = Arc::new(PushClient::new(PushClientConfig::new(url)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        client.set_handler(Arc::new(ChannelHandler(tx)));

        let runner = Arc::clone(&client);
        let open = tokio::spawn(async move { runner.open().await });

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.symbol, "7203");
        assert_eq!(second.symbol, "6758");
        assert!(client.is_opened());

        client.close().await.unwrap();
        assert!(!client.is_opened());
        assert_eq!(open.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PushClient::new(PushClientConfig::new(format!("ws://{addr}")));
        let err = client.open().await.unwrap_err();

        assert!(matches!(err, PushError::ConnectionFailed(_)));
        assert!(!client.is_opened());
    }

    #[tokio::test]
    async fn close_without_open_is_not_connected() {
        let client = PushClient::new(PushClientConfig::new("ws://127.0.0.1:1"));
        assert_eq!(client.close().await, Err(PushError::NotConnected));
    }
}
