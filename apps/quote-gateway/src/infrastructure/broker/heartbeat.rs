//! Push Link Heartbeat
//!
//! Detects a silent push socket. The push client pings on every tick of its
//! heartbeat interval; any inbound frame (quote, ping or pong) counts as
//! proof of life. When nothing arrives for longer than the timeout while a
//! ping is outstanding, the link is considered dead.

use std::time::{Duration, Instant};

use crate::infrastructure::config::WebSocketSettings;

/// Configuration for heartbeat behavior.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between ping frames.
    pub ping_interval: Duration,
    /// Silence tolerated after a ping before the link is declared dead.
    pub timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::from_websocket_settings(&WebSocketSettings::default())
    }
}

impl HeartbeatConfig {
    /// Create a new configuration with custom values.
    #[must_use]
    pub const fn new(ping_interval: Duration, timeout: Duration) -> Self {
        Self {
            ping_interval,
            timeout,
        }
    }

    /// Create configuration from `WebSocketSettings`.
    #[must_use]
    pub const fn from_websocket_settings(settings: &WebSocketSettings) -> Self {
        Self {
            ping_interval: settings.heartbeat_interval,
            timeout: settings.heartbeat_timeout,
        }
    }
}

/// What the push loop should do on a heartbeat tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatAction {
    /// Send a ping frame.
    Ping,
    /// The link has been silent too long; tear it down.
    Expired(Duration),
}

/// Liveness tracker for one push socket. Owned by the socket's read loop.
#[derive(Debug)]
pub struct HeartbeatMonitor {
    config: HeartbeatConfig,
    last_seen: Instant,
    ping_outstanding: bool,
}

impl HeartbeatMonitor {
    /// Start tracking a freshly opened socket.
    #[must_use]
    pub fn new(config: HeartbeatConfig) -> Self {
        Self::started_at(config, Instant::now())
    }

    const fn started_at(config: HeartbeatConfig, now: Instant) -> Self {
        Self {
            config,
            last_seen: now,
            ping_outstanding: false,
        }
    }

    /// Ping interval for the caller's ticker.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.config.ping_interval
    }

    /// Record any inbound frame.
    pub fn record_activity(&mut self) {
        self.record_activity_at(Instant::now());
    }

    fn record_activity_at(&mut self, now: Instant) {
        self.last_seen = now;
        self.ping_outstanding = false;
    }

    /// Decide what to do on a ticker tick.
    pub fn on_tick(&mut self) -> HeartbeatAction {
        self.on_tick_at(Instant::now())
    }

    fn on_tick_at(&mut self, now: Instant) -> HeartbeatAction {
        let silent_for = now.saturating_duration_since(self.last_seen);
        if self.ping_outstanding && silent_for > self.config.timeout {
            return HeartbeatAction::Expired(silent_for);
        }
        self.ping_outstanding = true;
        HeartbeatAction::Ping
    }
}

/// Error type for heartbeat operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeartbeatError {
    /// No frame arrived within the timeout.
    #[error("heartbeat timeout after {0:?}")]
    Timeout(Duration),
}
