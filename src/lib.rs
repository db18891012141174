//! Request-correlation tracking demo library.
//!
//! A correlation identifier travels from the HTTP client to the API server
//! (and back) via the `x-correlation-id` header, and every telemetry record
//! emitted on either side of the wire carries that identifier as a
//! structured property.

pub mod client;
pub mod config;
pub mod correlation;
pub mod http;
pub mod lifecycle;
pub mod telemetry;

pub use config::AppConfig;
pub use correlation::{CorrelationContext, CorrelationId, X_CORRELATION_ID};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use telemetry::TelemetryChannel;
