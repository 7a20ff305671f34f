//! Application Ports (Driver and Driven)
//!
//! Ports define the seams between the gateway's use cases and the outside
//! world. Infrastructure adapters implement them; tests substitute fakes.
//!
//! - **Driven ports**: [`Clock`], [`LoginPort`], [`QuotePort`],
//!   [`PushConnection`], [`QuoteSink`]
//! - **Callback ports**: [`PushHandler`], implemented by the broadcaster and
//!   invoked by the push connection for every inbound message

mod broker_port;
mod clock_port;
mod push_port;
mod sink_port;

pub use broker_port::{BrokerApiError, LoginPort, QuotePort};
pub use clock_port::Clock;
#[cfg(test)]
pub use clock_port::MockClock;
pub use push_port::{PushConnection, PushError, PushHandler};
pub use sink_port::QuoteSink;
