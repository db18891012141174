//! Client-side telemetry adapter.

use std::collections::BTreeMap;

use crate::telemetry::TelemetryChannel;

/// Thin adapter forwarding client telemetry to the shared channel.
///
/// Constructed explicitly at startup with an already-configured channel;
/// there is no lazy first-use initialization.
#[derive(Clone)]
pub struct ClientTelemetry {
    channel: TelemetryChannel,
}

impl ClientTelemetry {
    pub fn new(channel: TelemetryChannel) -> Self {
        Self { channel }
    }

    pub fn log_event(&self, name: &str, properties: BTreeMap<String, String>) {
        self.channel.track_event(name, properties);
    }

    pub fn log_exception(
        &self,
        error: &dyn std::error::Error,
        properties: BTreeMap<String, String>,
    ) {
        self.channel.track_exception(error, properties);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_events_to_the_channel() {
        let (channel, captured) = TelemetryChannel::capture();
        let telemetry = ClientTelemetry::new(channel);
        telemetry.log_event("call succeeded", BTreeMap::new());
        assert_eq!(captured.events().len(), 1);
    }
}
