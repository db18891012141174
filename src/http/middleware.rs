//! Request correlation middleware.
//!
//! Wraps the whole handler pipeline for one inbound request:
//! 1. Read the `x-correlation-id` request header; mint a fresh identifier
//!    and set it on the request when absent. An already-present value is
//!    never modified.
//! 2. Stash a [`CorrelationContext`] in the request extensions for handlers
//!    and telemetry adapters.
//! 3. Run the inner pipeline, then echo the identifier on the response's
//!    `x-correlation-id` header.
//! 4. If the response carries an [`ErrorDetail`] (an error a handler
//!    surfaced rather than handled), emit exactly one telemetry exception
//!    for it. No other component logs unhandled errors, so each error
//!    occurrence produces exactly one record.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use crate::correlation::{CorrelationContext, CorrelationId, X_CORRELATION_ID};
use crate::http::error::ErrorDetail;
use crate::http::server::AppState;
use crate::telemetry::RequestLogger;

pub async fn correlate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let (header_value, context) = match request.headers().get(&X_CORRELATION_ID) {
        Some(value) => {
            // Opaque echo; a non-UTF-8 value still round-trips unchanged.
            let context = match value.to_str() {
                Ok(s) => CorrelationContext::new(CorrelationId::from(s)),
                Err(_) => CorrelationContext::empty(),
            };
            (value.clone(), context)
        }
        None => {
            let id = CorrelationId::new();
            // Minted ids are hyphenated lowercase hex, always a valid header value.
            let value = HeaderValue::from_str(id.as_str()).unwrap();
            request
                .headers_mut()
                .insert(X_CORRELATION_ID, value.clone());
            (value, CorrelationContext::new(id))
        }
    };

    request.extensions_mut().insert(context.clone());

    let span = tracing::info_span!(
        "request",
        correlation_id = %context.id_string(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;

    response
        .headers_mut()
        .insert(X_CORRELATION_ID, header_value);

    if let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() {
        tracing::error!(
            correlation_id = %context.id_string(),
            kind = detail.kind,
            error = %detail,
            "Request failed"
        );
        RequestLogger::new(state.telemetry.clone(), context).log_exception(&detail);
    }

    response
}
