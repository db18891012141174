//! Server-side telemetry sink adapter.

use std::collections::BTreeMap;
use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::correlation::CorrelationContext;
use crate::telemetry::channel::TelemetryChannel;
use crate::telemetry::envelope::CORRELATION_ID_PROPERTY;

/// Per-request logger that enriches every record with the request's
/// correlation identifier before forwarding to the telemetry channel.
///
/// Fire-and-forget: neither method can fail from the caller's point of view.
#[derive(Clone)]
pub struct RequestLogger {
    channel: TelemetryChannel,
    context: CorrelationContext,
}

impl RequestLogger {
    pub fn new(channel: TelemetryChannel, context: CorrelationContext) -> Self {
        Self { channel, context }
    }

    pub fn context(&self) -> &CorrelationContext {
        &self.context
    }

    fn base_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert(
            CORRELATION_ID_PROPERTY.to_string(),
            self.context.id_string(),
        );
        properties
    }

    pub fn log_event(&self, name: &str) {
        self.channel.track_event(name, self.base_properties());
    }

    pub fn log_exception(&self, error: &dyn std::error::Error) {
        self.channel.track_exception(error, self.base_properties());
    }
}

impl<S> FromRequestParts<S> for RequestLogger
where
    S: Send + Sync,
    TelemetryChannel: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let channel = TelemetryChannel::from_ref(state);
        let context = match parts.extensions.get::<CorrelationContext>() {
            Some(context) => context.clone(),
            None => CorrelationContext::from_headers(&parts.headers),
        };
        Ok(Self::new(channel, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::CorrelationId;

    #[test]
    fn events_carry_the_correlation_id() {
        let (channel, captured) = TelemetryChannel::capture();
        let logger = RequestLogger::new(
            channel,
            CorrelationContext::new(CorrelationId::from("id-42")),
        );
        logger.log_event("something happened");

        let events = captured.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].properties[CORRELATION_ID_PROPERTY], "id-42");
    }

    #[test]
    fn exceptions_carry_an_empty_id_when_context_is_empty() {
        let (channel, captured) = TelemetryChannel::capture();
        let logger = RequestLogger::new(channel, CorrelationContext::empty());
        let error = std::io::Error::new(std::io::ErrorKind::Other, "failed");
        logger.log_exception(&error);

        let exceptions = captured.exceptions();
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].properties[CORRELATION_ID_PROPERTY], "");
        assert_eq!(exceptions[0].error, "failed");
    }
}
