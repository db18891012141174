//! Outbound request correlation interceptor.
//!
//! Every call made through [`CorrelatedClient`] mints a fresh correlation
//! identifier, sends it as the `x-correlation-id` request header, and
//! emits exactly one telemetry record for the call's final outcome:
//! - success: one event named by the request URL, carrying the identifier
//!   echoed on the response;
//! - failure: one exception carrying the error name, status, message, URL
//!   and echoed identifier, after which the error is returned to the
//!   caller unchanged.
//!
//! Transport errors and non-2xx responses are retried up to the configured
//! attempt cap with a fixed delay *between* attempts. Intermediate failed
//! attempts emit no telemetry. Retries of one call reuse its identifier;
//! it is one logical request chain.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::client::telemetry::ClientTelemetry;
use crate::config::ClientConfig;
use crate::correlation::{CorrelationId, X_CORRELATION_ID};
use crate::telemetry::CORRELATION_ID_PROPERTY;

/// Errors surfaced to callers of the correlated client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request to {url} failed with status {status}")]
    Status {
        status: StatusCode,
        url: String,
        correlation_id: Option<String>,
    },
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    fn name(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::Url(_) => "invalid_url",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            // Any transport failure or non-2xx response gets another attempt.
            Self::Transport(_) | Self::Status { .. } => true,
            Self::Url(_) => false,
        }
    }

    /// Properties attached to the failure exception record.
    fn telemetry_properties(&self, url: &Url) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert("name".to_string(), self.name().to_string());
        properties.insert("message".to_string(), self.to_string());
        properties.insert("url".to_string(), url.to_string());
        match self {
            Self::Status {
                status,
                correlation_id,
                ..
            } => {
                properties.insert(
                    "status".to_string(),
                    format!(
                        "{} - {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("unknown")
                    ),
                );
                properties.insert(
                    CORRELATION_ID_PROPERTY.to_string(),
                    correlation_id.clone().unwrap_or_default(),
                );
            }
            _ => {
                properties.insert(CORRELATION_ID_PROPERTY.to_string(), String::new());
            }
        }
        properties
    }
}

/// HTTP client wrapper that correlates and logs every outbound call.
pub struct CorrelatedClient {
    http: reqwest::Client,
    base_url: Url,
    telemetry: ClientTelemetry,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CorrelatedClient {
    pub fn new(config: &ClientConfig, telemetry: ClientTelemetry) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.api_base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            telemetry,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// GET an absolute path under the configured base URL.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let url = match self.base_url.join(path) {
            Ok(url) => url,
            Err(error) => {
                let error = ClientError::Url(error);
                self.telemetry
                    .log_exception(&error, error.telemetry_properties(&self.base_url));
                return Err(error);
            }
        };

        let correlation_id = CorrelationId::new();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send_once(&url, &correlation_id).await {
                Ok(response) => {
                    let echoed = echoed_correlation_id(response.headers());
                    let mut properties = BTreeMap::new();
                    properties.insert(
                        CORRELATION_ID_PROPERTY.to_string(),
                        echoed.unwrap_or_default(),
                    );
                    self.telemetry.log_event(url.as_str(), properties);
                    return Ok(response);
                }
                Err(error) if attempt < self.max_attempts && error.is_retryable() => {
                    tracing::debug!(
                        url = %url,
                        attempt,
                        delay = ?self.retry_delay,
                        error = %error,
                        "Retrying request"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(error) => {
                    self.telemetry
                        .log_exception(&error, error.telemetry_properties(&url));
                    return Err(error);
                }
            }
        }
    }

    /// GET /api/v1.0/values/getall and decode the body.
    pub async fn get_values(&self) -> Result<Vec<String>, ClientError> {
        let response = self.get("/api/v1.0/values/getall").await?;
        Ok(response.json().await?)
    }

    async fn send_once(
        &self,
        url: &Url,
        correlation_id: &CorrelationId,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .get(url.clone())
            .header(X_CORRELATION_ID, correlation_id.as_str())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status {
                status,
                url: url.to_string(),
                correlation_id: echoed_correlation_id(response.headers()),
            })
        }
    }
}

fn echoed_correlation_id(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(&X_CORRELATION_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
