//! Correlation tracking demo server.
//!
//! Serves the placeholder values API with the request correlation
//! middleware installed, and delivers telemetry in the background.
//!
//! ```text
//!     Client Request            ┌──────────────────────────────────────────┐
//!     (x-correlation-id) ──────▶│ correlation middleware                   │
//!                               │   read or mint id, stash context         │
//!                               │        │                                 │
//!                               │        ▼                                 │
//!                               │ values handlers ──▶ RequestLogger ───────┼──▶ telemetry
//!                               │        │                                 │    worker
//!     Client Response           │        ▼                                 │      │
//!     (id echoed)     ◀─────────│ response (+ header, exception logging)   │      ▼
//!                               └──────────────────────────────────────────┘   ingestion
//!                                                                             endpoint
//! ```

use std::path::Path;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use correlation_demo::config::{load_config, AppConfig};
use correlation_demo::http::HttpServer;
use correlation_demo::lifecycle::Shutdown;
use correlation_demo::telemetry::TelemetryChannel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; an optional path argument overrides the defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => AppConfig::default(),
    };

    // Initialize tracing subscriber
    let default_filter = format!(
        "correlation_demo={},tower_http=debug",
        config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("correlation-demo v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        telemetry_enabled = config.telemetry.enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();

    // Spawn the telemetry delivery worker (absent when telemetry is disabled).
    let (telemetry, worker) = TelemetryChannel::from_config(&config.telemetry);
    let worker_handle = worker.map(|worker| {
        let rx = shutdown.subscribe();
        tokio::spawn(worker.run(rx))
    });

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });

    // Create and run HTTP server
    let server = HttpServer::new(config, telemetry);
    server.run(listener, server_shutdown).await?;

    // Let the telemetry worker drain its queue.
    if let Some(handle) = worker_handle {
        let _ = handle.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
