//! Prometheus Metrics Module
//!
//! Exposes gateway metrics in Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Quotes**: pushes received from the broker and delivered to consumers
//! - **Consumers**: attached streaming consumers and why they detached
//! - **Upstream**: login and push-connect attempts, link state
//! - **Latency**: broker REST round trips
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the health server port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::domain::streaming::{LinkState, StreamError};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Later calls return the handle installed by the first one.
///
/// # Errors
///
/// Returns an error if the global recorder cannot be installed.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "quote_gateway_pushes_received_total",
        "Total quotes pushed by the broker"
    );
    describe_counter!(
        "quote_gateway_pushes_delivered_total",
        "Total quotes delivered to streaming consumers"
    );
    describe_counter!(
        "quote_gateway_consumers_detached_total",
        "Total streaming consumers detached, by reason"
    );
    describe_gauge!(
        "quote_gateway_consumers",
        "Number of attached streaming consumers"
    );

    describe_counter!(
        "quote_gateway_login_attempts_total",
        "Total broker login attempts, by outcome"
    );
    describe_counter!(
        "quote_gateway_connect_attempts_total",
        "Total push connection attempts, by outcome"
    );
    describe_gauge!(
        "quote_gateway_upstream_link",
        "Upstream push link state (0 disconnected, 1 connecting, 2 connected)"
    );

    describe_histogram!(
        "quote_gateway_rest_request_seconds",
        "Broker REST request latency"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Outcome label for upstream attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The attempt succeeded.
    Success,
    /// The attempt failed.
    Failure,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    /// Outcome of a result.
    #[must_use]
    pub const fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Label for why a consumer was detached.
#[must_use]
pub const fn detach_reason(outcome: &Result<(), StreamError>) -> &'static str {
    match outcome {
        Ok(()) => "upstream_closed",
        Err(StreamError::Connect(_)) => "connect_failed",
        Err(StreamError::Delivery(_)) => "delivery_failed",
        Err(StreamError::Closed) => "closed",
    }
}

const fn link_state_value(state: LinkState) -> f64 {
    match state {
        LinkState::Disconnected => 0.0,
        LinkState::Connecting => 1.0,
        LinkState::Connected => 2.0,
    }
}

/// Record a quote pushed by the broker.
pub fn record_push_received() {
    counter!("quote_gateway_pushes_received_total").increment(1);
}

/// Record a quote delivered to one consumer.
pub fn record_push_delivered() {
    counter!("quote_gateway_pushes_delivered_total").increment(1);
}

/// Record a detached consumer.
pub fn record_consumer_detached(outcome: &Result<(), StreamError>) {
    gauge!("quote_gateway_consumers").decrement(1.0);
    counter!(
        "quote_gateway_consumers_detached_total",
        "reason" => detach_reason(outcome)
    )
    .increment(1);
}

/// Record a streaming consumer attaching.
pub fn record_consumer_attached() {
    gauge!("quote_gateway_consumers").increment(1.0);
}

/// Record a broker login attempt.
pub fn record_login_attempt(outcome: Outcome) {
    counter!(
        "quote_gateway_login_attempts_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a push connection attempt.
pub fn record_connect_attempt(outcome: Outcome) {
    counter!(
        "quote_gateway_connect_attempts_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Update the upstream link state.
pub fn set_link_state(state: LinkState) {
    gauge!("quote_gateway_upstream_link").set(link_state_value(state));
}

/// Record a broker REST round trip.
pub fn record_rest_duration(endpoint: &'static str, duration: Duration) {
    histogram!(
        "quote_gateway_rest_request_seconds",
        "endpoint" => endpoint
    )
    .record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Success.as_str(), "success");
        assert_eq!(Outcome::Failure.as_str(), "failure");
        assert_eq!(Outcome::of(&Ok::<(), ()>(())), Outcome::Success);
        assert_eq!(Outcome::of(&Err::<(), ()>(())), Outcome::Failure);
    }

    #[test]
    fn detach_reason_labels() {
        assert_eq!(detach_reason(&Ok(())), "upstream_closed");
        assert_eq!(
            detach_reason(&Err(StreamError::Connect("refused".to_string()))),
            "connect_failed"
        );
        assert_eq!(
            detach_reason(&Err(StreamError::Delivery("lagging".to_string()))),
            "delivery_failed"
        );
        assert_eq!(detach_reason(&Err(StreamError::Closed)), "closed");
    }

    #[test]
    fn link_state_values() {
        assert!(link_state_value(LinkState::Disconnected).abs() < f64::EPSILON);
        assert!((link_state_value(LinkState::Connected) - 2.0).abs() < f64::EPSILON);
    }
}
