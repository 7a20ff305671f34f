#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Quote Gateway - Broker Session and Quote Multiplexer
//!
//! A gRPC gateway in front of a broker's local REST and push API. It keeps
//! one daily session token for privileged requests and one upstream push
//! WebSocket shared by every downstream quote stream.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: In-memory state with no I/O
//!   - `session`: Token record, token cache and the daily 06:30 cutoff
//!   - `streaming`: Pushed quotes, stream errors, link state
//!   - `subscription`: Registry of attached consumers
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Broker REST, push connection, clock and sink interfaces
//!   - `services`: Session manager, stream broadcaster
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `broker`: REST client and push WebSocket client
//!   - `grpc`: gRPC gateway server
//!   - `config`: Configuration from environment variables
//!   - `health`: Health check HTTP endpoint
//!   - `metrics`, `telemetry`: Prometheus metrics and tracing
//!
//! # Data Flow
//!
//! ```text
//!                          ┌─────────────┐     ┌─────────────┐
//! Broker push WS ─────────►│   Stream    │────►│    gRPC     │──► Client 1
//!   (opened on first       │ Broadcaster │     │   Server    │──► Client 2
//!    attach, closed when   └─────────────┘     └─────────────┘──► Client N
//!    the last one leaves)                             │
//!                                                     ▼
//! Broker REST ◄──────────── SessionManager ◄──── GetQuote / RefreshSession
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Session and streaming state with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::session::{ApiCredential, TokenCache, TokenRecord, session_cutoff};
pub use domain::streaming::{LinkState, QuotePush, StreamError};

// Application services and ports
pub use application::ports::{
    BrokerApiError, Clock, LoginPort, PushConnection, PushError, PushHandler, QuotePort, QuoteSink,
};
pub use application::services::{ConsumerRegistry, SessionError, SessionManager, StreamBroadcaster};

// Infrastructure config
pub use infrastructure::config::{
    BrokerSettings, ConfigError, Environment, GatewayConfig, ServerSettings, StreamSettings,
    WebSocketSettings,
};

// Broker adapters
pub use infrastructure::broker::{BrokerRestClient, PushClient, PushClientConfig};
pub use infrastructure::clock::SystemClock;

// Health server
pub use infrastructure::health::{HealthServer, HealthServerError, HealthServerState};

// gRPC server (for integration tests)
pub use infrastructure::grpc::{
    GrpcQuoteSink, QuoteGatewayServer, proto::quote_gateway::v1 as proto,
};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
