//! Domain Layer - Session and streaming state with no I/O.
//!
//! This layer holds the in-memory state the gateway shares between
//! requests: the session token record and the registry of attached
//! streaming consumers. Nothing here talks to the network.

/// Session token record, cache and daily cutoff arithmetic.
pub mod session;

/// Quote push messages, stream errors and link states.
pub mod streaming;

/// Registry of attached streaming consumers.
pub mod subscription;
