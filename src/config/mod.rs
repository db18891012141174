//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a missing or minimal config file works.
//! - Validation separates syntactic (serde) from semantic checks and
//!   returns all errors, not just the first.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, ClientConfig, ListenerConfig, ObservabilityConfig, TelemetryConfig, TimeoutConfig,
};
