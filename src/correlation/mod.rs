//! Correlation identifiers and the per-request correlation context.
//!
//! # Data Flow
//! ```text
//! client interceptor mints CorrelationId
//!     → x-correlation-id request header
//!     → server middleware (reads, or mints when absent)
//!     → CorrelationContext in request extensions
//!     → handlers / telemetry adapters read it
//!     → x-correlation-id response header (echoed)
//!     → client interceptor reads the echo
//! ```
//!
//! # Design Decisions
//! - The context is explicit per-request state carried in request
//!   extensions, never a process-wide variable. Concurrent requests each
//!   see their own identifier.
//! - Handlers never mint identifiers; that is the middleware's job.

pub mod context;
pub mod id;

pub use context::CorrelationContext;
pub use id::{CorrelationId, InvalidCorrelationId, X_CORRELATION_ID};
