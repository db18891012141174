//! Placeholder values API.
//!
//! CRUD-shaped handlers returning static data; their only real job is to
//! exercise the correlation/telemetry pipeline.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Json;

use crate::http::error::ApiError;
use crate::telemetry::RequestLogger;

/// GET /api/v1.0/values/getall
///
/// Logs two events so the correlation of multiple records within one
/// request is observable.
pub async fn get_all(logger: RequestLogger) -> Json<Vec<&'static str>> {
    logger.log_event("values getall requested");
    let values = vec!["value1", "value2"];
    logger.log_event("values getall succeeded");
    Json(values)
}

/// GET /api/v1.0/values/{id}
///
/// An invalid id is handled inline: logged as a telemetry exception here,
/// not surfaced to the middleware, so it is recorded exactly once.
pub async fn get_by_id(logger: RequestLogger, Path(id): Path<String>) -> Json<&'static str> {
    if id.parse::<u32>().is_err() {
        let error = ApiError::InvalidArgument(format!("invalid id provided: {:?}", id));
        logger.log_exception(&error);
    }
    Json("value")
}

/// GET /api/v1.0/values/fail
///
/// Always surfaces an error so the middleware's exception path is
/// demonstrable end to end.
pub async fn fail() -> Result<Json<&'static str>, ApiError> {
    Err(ApiError::Internal(
        "synthetic failure from the values api".to_string(),
    ))
}

/// POST /api/v1.0/values
pub async fn create(_body: String) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// PUT /api/v1.0/values/{id}
pub async fn update(Path(_id): Path<String>, _body: String) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1.0/values/{id}
pub async fn remove(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}
