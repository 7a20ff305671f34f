//! Gateway Configuration Settings
//!
//! Configuration types for the quote gateway, loaded from environment
//! variables.

use std::time::Duration;

use crate::domain::session::ApiCredential;

/// Broker API environment (paper vs live).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Paper (verification) environment.
    #[default]
    Paper,
    /// Live (production) environment.
    Live,
}

impl Environment {
    /// Parse environment from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "LIVE" => Self::Live,
            _ => Self::Paper,
        }
    }

    /// Check if this is the live environment.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Get the environment name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Live => "live",
        }
    }

    /// Default port of the broker API in this environment.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Live => 18080,
            Self::Paper => 18081,
        }
    }
}

/// Broker API endpoints.
#[derive(Debug, Clone)]
pub struct BrokerSettings {
    /// Base URL of the REST API.
    pub rest_url: String,
    /// URL of the push WebSocket.
    pub push_url: String,
    /// Timeout for REST requests.
    pub http_timeout: Duration,
}

impl BrokerSettings {
    /// Default endpoints for a broker host and environment.
    #[must_use]
    pub fn for_host(host: &str, environment: Environment) -> Self {
        let port = environment.default_port();
        Self {
            rest_url: format!("http://{host}:{port}/kabusapi"),
            push_url: format!("ws://{host}:{port}/kabusapi/websocket"),
            http_timeout: Duration::from_secs(10),
        }
    }
}

/// Push WebSocket settings.
#[derive(Debug, Clone)]
pub struct WebSocketSettings {
    /// Heartbeat ping interval.
    pub heartbeat_interval: Duration,
    /// Heartbeat timeout before considering connection dead.
    pub heartbeat_timeout: Duration,
}

impl Default for WebSocketSettings {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            heartbeat_timeout: Duration::from_secs(60),
        }
    }
}

/// Downstream streaming settings.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Per-consumer outbound buffer. A consumer whose buffer is full is
    /// detached.
    pub buffer_size: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self { buffer_size: 1024 }
    }
}

/// Server port settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// gRPC server port.
    pub grpc_port: u16,
    /// Health check HTTP port.
    pub health_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            grpc_port: 50061,
            health_port: 8086,
        }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Broker environment.
    pub environment: Environment,
    /// Broker API password.
    pub credential: ApiCredential,
    /// Broker endpoints.
    pub broker: BrokerSettings,
    /// Server port settings.
    pub server: ServerSettings,
    /// Push WebSocket settings.
    pub websocket: WebSocketSettings,
    /// Downstream streaming settings.
    pub stream: StreamSettings,
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `BROKER_API_PASSWORD` is missing or empty.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = lookup("BROKER_API_PASSWORD")
            .ok_or_else(|| ConfigError::MissingEnvVar("BROKER_API_PASSWORD".to_string()))?;

        if password.is_empty() {
            return Err(ConfigError::EmptyValue("BROKER_API_PASSWORD".to_string()));
        }

        let environment = lookup("BROKER_ENV")
            .map(|s| Environment::from_str_case_insensitive(&s))
            .unwrap_or_default();

        let host = lookup("BROKER_HOST")
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_string());

        let defaults = BrokerSettings::for_host(&host, environment);
        let broker = BrokerSettings {
            rest_url: lookup("BROKER_REST_URL")
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.rest_url),
            push_url: lookup("BROKER_PUSH_URL")
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.push_url),
            http_timeout: parse_duration_secs(
                &lookup,
                "BROKER_HTTP_TIMEOUT_SECS",
                defaults.http_timeout,
            ),
        };

        let server = ServerSettings {
            grpc_port: parse_u16(
                &lookup,
                "GATEWAY_GRPC_PORT",
                ServerSettings::default().grpc_port,
            ),
            health_port: parse_u16(
                &lookup,
                "GATEWAY_HEALTH_PORT",
                ServerSettings::default().health_port,
            ),
        };

        let websocket = WebSocketSettings {
            heartbeat_interval: parse_duration_secs(
                &lookup,
                "GATEWAY_HEARTBEAT_INTERVAL_SECS",
                WebSocketSettings::default().heartbeat_interval,
            ),
            heartbeat_timeout: parse_duration_secs(
                &lookup,
                "GATEWAY_HEARTBEAT_TIMEOUT_SECS",
                WebSocketSettings::default().heartbeat_timeout,
            ),
        };

        let stream = StreamSettings {
            buffer_size: parse_usize(
                &lookup,
                "GATEWAY_STREAM_BUFFER",
                StreamSettings::default().buffer_size,
            )
            .max(1),
        };

        Ok(Self {
            environment,
            credential: ApiCredential::new(password),
            broker,
            server,
            websocket,
            stream,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_u16<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: u16) -> u16 {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_usize<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: usize) -> usize {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_duration_secs<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    key: &str,
    default: Duration,
) -> Duration {
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_parsing() {
        assert_eq!(
            Environment::from_str_case_insensitive("live"),
            Environment::Live
        );
        assert_eq!(
            Environment::from_str_case_insensitive("LIVE"),
            Environment::Live
        );
        assert_eq!(
            Environment::from_str_case_insensitive("paper"),
            Environment::Paper
        );
        assert_eq!(
            Environment::from_str_case_insensitive("unknown"),
            Environment::Paper
        );
    }

    #[test]
    fn environment_ports() {
        assert_eq!(Environment::Live.default_port(), 18080);
        assert_eq!(Environment::Paper.default_port(), 18081);
        assert!(Environment::Live.is_live());
        assert!(!Environment::Paper.is_live());
    }

    #[test]
    fn missing_password_is_an_error() {
        let err = GatewayConfig::from_source(source(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "BROKER_API_PASSWORD"));

        let err = GatewayConfig::from_source(source(&[("BROKER_API_PASSWORD", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(_)));
    }

    #[test]
    fn defaults_target_paper_on_localhost() {
        let config = GatewayConfig::from_source(source(&[("BROKER_API_PASSWORD", "pw")])).unwrap();

        assert_eq!(config.environment, Environment::Paper);
        assert_eq!(config.broker.rest_url, "http://localhost:18081/kabusapi");
        assert_eq!(config.broker.push_url, "ws://localhost:18081/kabusapi/websocket");
        assert_eq!(config.broker.http_timeout, Duration::from_secs(10));
        assert_eq!(config.server.grpc_port, 50061);
        assert_eq!(config.server.health_port, 8086);
        assert_eq!(config.stream.buffer_size, 1024);
        assert_eq!(config.websocket.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.websocket.heartbeat_timeout, Duration::from_secs(60));
        assert_eq!(config.credential.expose(), "pw");
    }

    #[test]
    fn overrides_are_applied() {
        let config = GatewayConfig::from_source(source(&[
            ("BROKER_API_PASSWORD", "pw"),
            ("BROKER_ENV", "live"),
            ("BROKER_HOST", "10.0.0.5"),
            ("BROKER_PUSH_URL", "ws://push.internal/ws"),
            ("BROKER_HTTP_TIMEOUT_SECS", "3"),
            ("GATEWAY_GRPC_PORT", "6000"),
            ("GATEWAY_STREAM_BUFFER", "0"),
            ("GATEWAY_HEALTH_PORT", "not-a-port"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Live);
        assert_eq!(config.broker.rest_url, "http://10.0.0.5:18080/kabusapi");
        assert_eq!(config.broker.push_url, "ws://push.internal/ws");
        assert_eq!(config.broker.http_timeout, Duration::from_secs(3));
        assert_eq!(config.server.grpc_port, 6000);
        assert_eq!(config.server.health_port, 8086);
        assert_eq!(config.stream.buffer_size, 1);
    }

    #[test]
    fn config_debug_redacts_password() {
        let config =
            GatewayConfig::from_source(source(&[("BROKER_API_PASSWORD", "hunter2")])).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
