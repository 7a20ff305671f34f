//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the application services and port interfaces
//! that define how the domain interacts with the broker and with
//! downstream consumers.

/// Port interfaces for external systems (broker REST, push feed, sinks).
pub mod ports;

/// Application services for session management and quote fan-out.
pub mod services;
