//! Telemetry record and wire envelope types.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Property key carrying the correlation identifier on every record.
pub const CORRELATION_ID_PROPERTY: &str = "CorrelationId";

/// A named event with string custom properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

/// An error occurrence with string custom properties.
///
/// The error itself crosses the wire as its rendered message; the structured
/// details (status, url, correlation id) live in `properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryException {
    pub error: String,
    pub properties: BTreeMap<String, String>,
}

/// A record queued for delivery to the telemetry backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryRecord {
    Event(TelemetryEvent),
    Exception(TelemetryException),
}

impl TelemetryRecord {
    pub fn event(name: impl Into<String>, properties: BTreeMap<String, String>) -> Self {
        Self::Event(TelemetryEvent {
            name: name.into(),
            properties,
        })
    }

    pub fn exception(
        error: &dyn std::error::Error,
        properties: BTreeMap<String, String>,
    ) -> Self {
        Self::Exception(TelemetryException {
            error: error.to_string(),
            properties,
        })
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        match self {
            Self::Event(event) => &event.properties,
            Self::Exception(exception) => &exception.properties,
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.properties()
            .get(CORRELATION_ID_PROPERTY)
            .map(String::as_str)
    }
}

/// Wire format posted to the ingestion endpoint, one record per envelope.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<'a> {
    #[serde(rename = "iKey")]
    pub instrumentation_key: &'a str,
    pub time_unix_ms: u64,
    #[serde(flatten)]
    pub record: &'a TelemetryRecord,
}

pub(crate) fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_with_tag_and_key() {
        let mut properties = BTreeMap::new();
        properties.insert(CORRELATION_ID_PROPERTY.to_string(), "abc".to_string());
        let record = TelemetryRecord::event("values listed", properties);
        let envelope = Envelope {
            instrumentation_key: "ikey-123",
            time_unix_ms: 42,
            record: &record,
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["iKey"], "ikey-123");
        assert_eq!(value["type"], "event");
        assert_eq!(value["name"], "values listed");
        assert_eq!(value["properties"]["CorrelationId"], "abc");
    }

    #[test]
    fn exception_records_render_the_error() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let record = TelemetryRecord::exception(&error, BTreeMap::new());
        match record {
            TelemetryRecord::Exception(exception) => assert_eq!(exception.error, "boom"),
            _ => panic!("expected exception record"),
        }
    }

    #[test]
    fn correlation_id_accessor_reads_property() {
        let mut properties = BTreeMap::new();
        properties.insert(CORRELATION_ID_PROPERTY.to_string(), "xyz".to_string());
        let record = TelemetryRecord::event("e", properties);
        assert_eq!(record.correlation_id(), Some("xyz"));
    }
}
