//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Returns all validation errors, not just the first.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a valid socket address: {:?}", config.listener.bind_address),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.telemetry.enabled {
        if config.telemetry.instrumentation_key.is_empty() {
            errors.push(ValidationError {
                field: "telemetry.instrumentation_key",
                message: "required when telemetry is enabled".to_string(),
            });
        }
        if Url::parse(&config.telemetry.ingestion_endpoint).is_err() {
            errors.push(ValidationError {
                field: "telemetry.ingestion_endpoint",
                message: format!("not a valid url: {:?}", config.telemetry.ingestion_endpoint),
            });
        }
        if config.telemetry.queue_capacity == 0 {
            errors.push(ValidationError {
                field: "telemetry.queue_capacity",
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if Url::parse(&config.client.api_base_url).is_err() {
        errors.push(ValidationError {
            field: "client.api_base_url",
            message: format!("not a valid url: {:?}", config.client.api_base_url),
        });
    }

    if config.client.max_attempts == 0 {
        errors.push(ValidationError {
            field: "client.max_attempts",
            message: "must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
