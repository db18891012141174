//! Request-scoped correlation context.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::correlation::id::{CorrelationId, X_CORRELATION_ID};

/// The correlation identifier associated with one in-flight request.
///
/// Created by the correlation middleware (read from the inbound header, or
/// minted there when absent) and stored in the request extensions. The value
/// is stable for the life of the request; reading it has no side effects.
///
/// When extracted on a route without the middleware installed, the context
/// falls back to a pure read of the inbound `x-correlation-id` header and is
/// empty if the header is missing.
#[derive(Debug, Clone, Default)]
pub struct CorrelationContext {
    id: Option<CorrelationId>,
}

impl CorrelationContext {
    pub fn new(id: CorrelationId) -> Self {
        Self { id: Some(id) }
    }

    /// Context for a request that carried no identifier.
    pub fn empty() -> Self {
        Self { id: None }
    }

    /// Read the inbound header, treating the value as an opaque token.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(&X_CORRELATION_ID)
            .and_then(|value| value.to_str().ok())
            .map(CorrelationId::from);
        Self { id }
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.id.as_ref()
    }

    /// The identifier as a property value; empty string when absent.
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for CorrelationContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<CorrelationContext>() {
            return Ok(context.clone());
        }
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert(X_CORRELATION_ID, HeaderValue::from_static("abc-123"));
        let context = CorrelationContext::from_headers(&headers);
        assert_eq!(context.id_string(), "abc-123");
    }

    #[test]
    fn empty_when_header_absent() {
        let context = CorrelationContext::from_headers(&HeaderMap::new());
        assert!(context.correlation_id().is_none());
        assert_eq!(context.id_string(), "");
    }

    #[test]
    fn repeated_reads_are_stable() {
        let context = CorrelationContext::new(CorrelationId::from("fixed"));
        assert_eq!(context.id_string(), context.id_string());
    }
}
