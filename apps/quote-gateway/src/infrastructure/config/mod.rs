//! Configuration Module
//!
//! Configuration loading for the gateway service.

mod settings;

pub use settings::{
    BrokerSettings, ConfigError, Environment, GatewayConfig, ServerSettings, StreamSettings,
    WebSocketSettings,
};
