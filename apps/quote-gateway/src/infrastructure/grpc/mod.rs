//! gRPC Gateway Server
//!
//! Implements the `QuoteGatewayService` gRPC service that exposes the broker
//! quote feed and session to downstream clients.
//!
//! # Architecture
//!
//! Each `StreamQuotes` call:
//!
//! 1. Creates a bounded response channel and wraps it in a [`GrpcQuoteSink`]
//! 2. Attaches the sink to the shared stream broadcaster
//! 3. Streams forwarded quotes (filtered by the requested symbols)
//! 4. Ends cleanly when the upstream link closes, or with `UNAVAILABLE`
//!    carrying the error the consumer was detached with
//!
//! The protobuf and service stubs under `generated/` are produced from
//! `proto/quote_gateway/v1/gateway.proto` and checked in.

pub mod server;
pub mod sink;

// Allow clippy warnings and missing docs in generated code
#[allow(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
pub mod proto {
    pub mod quote_gateway {
        pub mod v1 {
            include!("generated/quote_gateway.v1.rs");
        }
    }
}

pub use server::{DEFAULT_BUFFER_SIZE, QuoteGatewayServer};
pub use sink::GrpcQuoteSink;
