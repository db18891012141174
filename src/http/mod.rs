//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → middleware.rs (read or mint correlation id, stash context)
//!     → values.rs handlers (placeholder CRUD, emit telemetry)
//!     → error.rs (ApiError → response + ErrorDetail extension)
//!     → middleware.rs (echo id on response, log unhandled errors once)
//!     → outbound response
//! ```

pub mod error;
pub mod middleware;
pub mod server;
pub mod values;

pub use error::{ApiError, ErrorDetail};
pub use server::{AppState, HttpServer};
