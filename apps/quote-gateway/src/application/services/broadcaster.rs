//! Stream Broadcaster
//!
//! Multiplexes the single upstream push connection to every attached
//! streaming consumer.
//!
//! # Design
//!
//! - The upstream link is opened lazily: the first consumer attaching while
//!   the link is down spawns one connect task.
//! - Every inbound push is forwarded to each attached consumer in turn. A
//!   consumer whose send fails is detached with that error; the others keep
//!   receiving.
//! - When a fan-out pass leaves no consumer attached, the link is closed.
//! - When the connect task's `open` call returns, every consumer still
//!   attached is detached with its outcome: `Ok(())` after a clean close,
//!   [`StreamError::Connect`] after a failure.
//!
//! Consumers that attach while a connect attempt is in flight join that
//! attempt and share its outcome. The next attach after the attempt finishes
//! starts a fresh one.
//!
//! # Example
//!
//! ```rust,ignore
//! let broadcaster = StreamBroadcaster::new(registry, push_client);
//!
//! // Blocks until this consumer is detached.
//! broadcaster.attach(Arc::new(sink)).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::application::ports::{PushConnection, PushHandler, QuoteSink};
use crate::domain::streaming::{LinkState, QuotePush, StreamError};
use crate::domain::subscription::{Completion, SubscriberRegistry};

/// Registry of attached consumers keyed by their outbound sink.
pub type ConsumerRegistry = SubscriberRegistry<Arc<dyn QuoteSink>>;

/// Guards the zero-to-one transition of the upstream link.
#[derive(Debug, Default)]
struct LinkGuard {
    connecting: bool,
}

/// Fans one upstream push feed out to many downstream consumers.
///
/// Cheap to clone; clones share the registry, connection and link guard.
#[derive(Clone)]
pub struct StreamBroadcaster {
    registry: Arc<ConsumerRegistry>,
    connection: Arc<dyn PushConnection>,
    link: Arc<Mutex<LinkGuard>>,
}

impl std::fmt::Debug for StreamBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBroadcaster")
            .field("registry", &self.registry)
            .field("link_state", &self.link_state())
            .finish_non_exhaustive()
    }
}

impl StreamBroadcaster {
    /// Create a broadcaster over a shared registry and push connection.
    #[must_use]
    pub fn new(registry: Arc<ConsumerRegistry>, connection: Arc<dyn PushConnection>) -> Self {
        Self {
            registry,
            connection,
            link: Arc::new(Mutex::new(LinkGuard::default())),
        }
    }

    /// Attach a consumer and wait until it is detached.
    ///
    /// Opens the upstream link in the background when it is down.
    ///
    /// # Errors
    ///
    /// Returns the error this consumer was detached with:
    /// [`StreamError::Connect`] when the upstream link failed,
    /// [`StreamError::Delivery`] when forwarding to this consumer failed.
    pub async fn attach(&self, sink: Arc<dyn QuoteSink>) -> Result<(), StreamError> {
        let (completion_tx, completion_rx) = oneshot::channel::<Completion>();

        let (seq, spawn_connect) = {
            let mut link = self.link.lock();
            let seq = self.registry.add(sink, completion_tx);
            let spawn_connect = !link.connecting && !self.connection.is_opened();
            if spawn_connect {
                link.connecting = true;
            }
            (seq, spawn_connect)
        };

        tracing::debug!(
            consumer = seq,
            consumers = self.registry.len(),
            "Consumer attached"
        );

        if spawn_connect {
            self.spawn_connect();
        }

        let outcome = completion_rx.await.unwrap_or(Err(StreamError::Closed));
        tracing::debug!(consumer = seq, ok = outcome.is_ok(), "Consumer detached");
        outcome
    }

    /// Current state of the upstream link.
    #[must_use]
    pub fn link_state(&self) -> LinkState {
        if self.connection.is_opened() {
            LinkState::Connected
        } else if self.link.lock().connecting {
            LinkState::Connecting
        } else {
            LinkState::Disconnected
        }
    }

    /// Number of attached consumers.
    #[must_use]
    pub fn consumer_count(&self) -> usize {
        self.registry.len()
    }

    fn spawn_connect(&self) {
        let broadcaster = self.clone();

        tokio::spawn(async move {
            let handler: Arc<dyn PushHandler> = Arc::new(broadcaster.clone());
            broadcaster.connection.set_handler(handler);

            tracing::info!("Opening upstream push connection");
            let outcome = match broadcaster.connection.open().await {
                Ok(()) => {
                    tracing::info!("Upstream push connection closed");
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Upstream push connection failed");
                    Err(StreamError::Connect(e.to_string()))
                }
            };

            let mut link = broadcaster.link.lock();
            let sequences = broadcaster.registry.sequences();
            let released = sequences.len();
            for seq in sequences {
                broadcaster.registry.remove(seq, outcome.clone());
            }
            link.connecting = false;
            drop(link);

            tracing::debug!(released, "Released consumers after upstream link ended");
        });
    }
}

#[async_trait]
impl PushHandler for StreamBroadcaster {
    async fn on_push(&self, quote: QuotePush) -> Result<(), StreamError> {
        for (seq, sink) in self.registry.all() {
            if let Err(e) = sink.send(&quote).await {
                tracing::warn!(
                    consumer = seq,
                    symbol = %quote.symbol,
                    error = %e,
                    "Delivery failed, detaching consumer"
                );
                self.registry.remove(seq, Err(e));
            }
        }

        if !self.registry.has_any() && self.connection.is_opened() {
            tracing::info!("No consumers left, closing upstream push connection");
            if let Err(e) = self.connection.close().await {
                tracing::warn!(error = %e, "Failed to close upstream push connection");
            }
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
