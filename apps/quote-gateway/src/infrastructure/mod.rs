//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Broker REST and push WebSocket adapters.
pub mod broker;

/// Wall-clock adapter.
pub mod clock;

/// Configuration and dependency injection.
pub mod config;

/// gRPC gateway server implementation.
pub mod grpc;

/// Health check HTTP endpoint.
pub mod health;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// OpenTelemetry tracing integration.
pub mod telemetry;
