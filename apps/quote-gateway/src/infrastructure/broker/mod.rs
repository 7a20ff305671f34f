//! Broker API Adapters
//!
//! Implements the broker-facing ports:
//!
//! - **REST**: session login and one-off board snapshots ([`BrokerRestClient`])
//! - **Push**: the real-time board WebSocket ([`PushClient`])

pub mod codec;
pub mod heartbeat;
pub mod messages;
pub mod push;
pub mod rest;

pub use codec::{BoardCodec, CodecError};
pub use heartbeat::{HeartbeatAction, HeartbeatConfig, HeartbeatError, HeartbeatMonitor};
pub use push::{PushClient, PushClientConfig};
pub use rest::{BrokerRestClient, TOKEN_HEADER};
