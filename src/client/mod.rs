//! Client-side correlation interceptor and telemetry adapter.
//!
//! # Data Flow
//! ```text
//! caller (CLI, tests)
//!     → interceptor.rs (mint id, set header, retry, read echo)
//!     → reqwest transport
//!     → telemetry.rs (success event / failure exception)
//! ```

pub mod interceptor;
pub mod telemetry;

pub use interceptor::{ClientError, CorrelatedClient};
pub use telemetry::ClientTelemetry;
