//! API error type and its response mapping.
//!
//! Handlers return `Result<_, ApiError>`. Errors are translated into fixed
//! JSON error responses here (there is no exception re-raise at this
//! boundary); the correlation middleware performs the single
//! exception-to-telemetry translation by reading the `ErrorDetail` stashed
//! in the response extensions. Handlers that deal with an error themselves
//! log it inline and must not also return it, so no error is ever logged
//! twice.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Errors a handler can surface to the pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Record of an error response, consumed by the correlation middleware for
/// exactly-once exception logging.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub kind: &'static str,
    pub message: String,
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorDetail {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = ErrorDetail {
            kind: self.kind(),
            message: self.to_string(),
        };
        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));
        let mut response = (status, body).into_response();
        response.extensions_mut().insert(detail);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_map_to_500() {
        let response = ApiError::Internal("oops".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.kind, "internal");
        assert_eq!(detail.message, "internal error: oops");
    }

    #[test]
    fn invalid_argument_maps_to_400() {
        let response = ApiError::InvalidArgument("bad id".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorDetail>().is_some());
    }
}
