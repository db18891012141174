//! Telemetry emission subsystem.
//!
//! # Data Flow
//! ```text
//! RequestLogger (server) / ClientTelemetry (client)
//!     → TelemetryChannel (bounded queue, fire-and-forget)
//!     → TelemetryWorker (background task)
//!     → ingestion endpoint (HTTP POST, best-effort)
//! ```
//!
//! # Design Decisions
//! - Callers never block on delivery and never see transport failures;
//!   undeliverable records are dropped with a warning log.
//! - The channel is constructed explicitly from configuration at startup,
//!   not lazily on first use.
//! - Every record carries a `CorrelationId` property, empty when the
//!   originating request had none.

pub mod channel;
pub mod envelope;
pub mod logger;

pub use channel::{CapturedTelemetry, TelemetryChannel, TelemetryWorker};
pub use envelope::{
    TelemetryEvent, TelemetryException, TelemetryRecord, CORRELATION_ID_PROPERTY,
};
pub use logger::RequestLogger;
