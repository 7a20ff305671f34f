//! Quote Gateway Binary
//!
//! Starts the broker quote gateway.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin quote-gateway
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `BROKER_API_PASSWORD`: Broker API password
//!
//! ## Optional
//! - `BROKER_ENV`: PAPER | LIVE (default: PAPER)
//! - `BROKER_HOST`: Broker API host (default: localhost)
//! - `BROKER_REST_URL` / `BROKER_PUSH_URL`: Override the derived endpoints
//! - `BROKER_HTTP_TIMEOUT_SECS`: REST timeout (default: 10)
//! - `GATEWAY_GRPC_PORT`: gRPC server port (default: 50061)
//! - `GATEWAY_HEALTH_PORT`: Health check HTTP port (default: 8086)
//! - `GATEWAY_STREAM_BUFFER`: Per-client stream buffer (default: 1024)
//! - `GATEWAY_HEARTBEAT_INTERVAL_SECS` / `GATEWAY_HEARTBEAT_TIMEOUT_SECS`
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint
//! - `RUST_LOG`: Log filter

use std::net::SocketAddr;
use std::sync::Arc;

use quote_gateway::application::ports::PushConnection;
use quote_gateway::infrastructure::broker::HeartbeatConfig;
use quote_gateway::infrastructure::telemetry;
use quote_gateway::proto::quote_gateway_service_server::QuoteGatewayServiceServer;
use quote_gateway::{
    BrokerRestClient, ConsumerRegistry, GatewayConfig, HealthServer, HealthServerState,
    PushClient, PushClientConfig, QuoteGatewayServer, SessionManager, StreamBroadcaster,
    SystemClock, TokenCache, init_metrics,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "failed to install rustls crypto provider")?;

    load_dotenv();

    // Initialize telemetry (OpenTelemetry + tracing)
    let _telemetry_guard = telemetry::init()?;

    tracing::info!("Starting Quote Gateway");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics()?;

    let config = GatewayConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    // Session: shared token cache behind the single-flight manager
    let rest_client = Arc::new(BrokerRestClient::new(&config.broker)?);
    let session = Arc::new(SessionManager::new(
        Arc::new(TokenCache::new()),
        Arc::new(SystemClock),
        rest_client.clone(),
        config.credential.clone(),
    ));

    // Streaming: one push connection shared by every consumer
    let push_config = PushClientConfig::new(config.broker.push_url.clone())
        .with_heartbeat(HeartbeatConfig::from_websocket_settings(&config.websocket));
    let push_client = Arc::new(PushClient::new(push_config));
    let broadcaster = StreamBroadcaster::new(
        Arc::new(ConsumerRegistry::new()),
        push_client.clone(),
    );

    let grpc_server = Arc::new(
        QuoteGatewayServer::new(Arc::clone(&session), rest_client, broadcaster.clone())
            .with_buffer_size(config.stream.buffer_size),
    );

    // Initialize health server
    let health_state = Arc::new(HealthServerState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        Arc::clone(&session),
        broadcaster,
        shutdown_token.clone(),
    ));
    let health_server = HealthServer::new(
        config.server.health_port,
        health_state,
        shutdown_token.clone(),
    );

    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            tracing::error!(error = %e, "Health server error");
        }
    });

    // Spawn gRPC server
    let grpc_addr: SocketAddr = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = QuoteGatewayServiceServer::from_arc(grpc_server);
    let grpc_shutdown = shutdown_token.clone();

    let grpc_task = tokio::spawn(async move {
        tracing::info!(addr = %grpc_addr, "gRPC server listening");
        if let Err(e) = Server::builder()
            .add_service(grpc_service)
            .serve_with_shutdown(grpc_addr, grpc_shutdown.cancelled())
            .await
        {
            tracing::error!(error = %e, "gRPC server error");
        }
        tracing::info!("gRPC server stopped");
    });

    tracing::info!("Quote gateway ready");

    await_shutdown(shutdown_token).await;

    if push_client.is_opened() {
        if let Err(e) = push_client.close().await {
            tracing::warn!(error = %e, "Failed to close upstream push connection");
        }
    }
    if let Err(e) = grpc_task.await {
        tracing::warn!(error = %e, "gRPC server task ended abnormally");
    }

    tracing::info!("Quote gateway stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &GatewayConfig) {
    tracing::info!(
        environment = config.environment.as_str(),
        grpc_port = config.server.grpc_port,
        health_port = config.server.health_port,
        stream_buffer = config.stream.buffer_size,
        "Configuration loaded"
    );
    tracing::debug!(
        rest_url = %config.broker.rest_url,
        push_url = %config.broker.push_url,
        "Broker endpoints"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
    tracing::info!("Graceful shutdown started");
}
