//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the values handlers
//! - Wire up middleware (correlation, timeout, tracing, CORS)
//! - Serve on a pre-bound listener with graceful shutdown

use std::time::Duration;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::correlation::X_CORRELATION_ID;
use crate::http::{middleware, values};
use crate::telemetry::TelemetryChannel;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: TelemetryChannel,
}

impl FromRef<AppState> for TelemetryChannel {
    fn from_ref(state: &AppState) -> Self {
        state.telemetry.clone()
    }
}

/// HTTP server for the values API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, telemetry: TelemetryChannel) -> Self {
        let state = AppState { telemetry };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        // The original UI is served from another origin; the correlation
        // header must be exposed for the client interceptor to read it.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([X_CORRELATION_ID]);

        Router::new()
            .route("/api/v1.0/values/getall", get(values::get_all))
            .route("/api/v1.0/values/fail", get(values::fail))
            .route("/api/v1.0/values", post(values::create))
            .route(
                "/api/v1.0/values/{id}",
                get(values::get_by_id)
                    .put(values::update)
                    .delete(values::remove),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors)
                    .layer(axum::middleware::from_fn_with_state(
                        state.clone(),
                        middleware::correlate,
                    ))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
