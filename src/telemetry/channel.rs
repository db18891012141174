//! Fire-and-forget telemetry delivery channel.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use url::Url;

use crate::config::TelemetryConfig;
use crate::telemetry::envelope::{now_unix_ms, Envelope, TelemetryRecord};

/// Handle used by adapters to emit telemetry records.
///
/// Cloneable and cheap; emission never blocks and never fails from the
/// caller's point of view. When the queue is full or the worker is gone the
/// record is dropped with a warning.
#[derive(Clone)]
pub struct TelemetryChannel {
    sink: Sink,
}

#[derive(Clone)]
enum Sink {
    /// Production path: queue into the background delivery worker.
    Queue(mpsc::Sender<TelemetryRecord>),
    /// Test hook: records are kept in memory for assertions.
    Capture(Arc<Mutex<Vec<TelemetryRecord>>>),
    Disabled,
}

impl TelemetryChannel {
    /// Build a channel (and its delivery worker) from configuration.
    ///
    /// Returns no worker when telemetry is disabled or the endpoint is
    /// unusable; the channel then silently discards records.
    pub fn from_config(config: &TelemetryConfig) -> (Self, Option<TelemetryWorker>) {
        if !config.enabled {
            return (Self::disabled(), None);
        }
        let endpoint = match Url::parse(&config.ingestion_endpoint) {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!(
                    endpoint = %config.ingestion_endpoint,
                    error = %error,
                    "Invalid telemetry ingestion endpoint, telemetry disabled"
                );
                return (Self::disabled(), None);
            }
        };

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = TelemetryWorker {
            rx,
            client: reqwest::Client::new(),
            endpoint,
            instrumentation_key: config.instrumentation_key.clone(),
        };
        (
            Self {
                sink: Sink::Queue(tx),
            },
            Some(worker),
        )
    }

    /// A channel that discards everything.
    pub fn disabled() -> Self {
        Self {
            sink: Sink::Disabled,
        }
    }

    /// A channel that captures records in memory, for tests.
    pub fn capture() -> (Self, CapturedTelemetry) {
        let records = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sink: Sink::Capture(records.clone()),
            },
            CapturedTelemetry { records },
        )
    }

    pub fn track_event(&self, name: impl Into<String>, properties: BTreeMap<String, String>) {
        self.send(TelemetryRecord::event(name, properties));
    }

    pub fn track_exception(
        &self,
        error: &dyn std::error::Error,
        properties: BTreeMap<String, String>,
    ) {
        self.send(TelemetryRecord::exception(error, properties));
    }

    fn send(&self, record: TelemetryRecord) {
        match &self.sink {
            Sink::Queue(tx) => {
                if tx.try_send(record).is_err() {
                    tracing::warn!("Telemetry queue full or closed, dropping record");
                }
            }
            Sink::Capture(records) => {
                records
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(record);
            }
            Sink::Disabled => {}
        }
    }
}

/// In-memory view of captured telemetry, for tests.
#[derive(Clone)]
pub struct CapturedTelemetry {
    records: Arc<Mutex<Vec<TelemetryRecord>>>,
}

impl CapturedTelemetry {
    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn events(&self) -> Vec<crate::telemetry::TelemetryEvent> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                TelemetryRecord::Event(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn exceptions(&self) -> Vec<crate::telemetry::TelemetryException> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                TelemetryRecord::Exception(exception) => Some(exception),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// Background task delivering queued records to the ingestion endpoint.
pub struct TelemetryWorker {
    rx: mpsc::Receiver<TelemetryRecord>,
    client: reqwest::Client,
    endpoint: Url,
    instrumentation_key: String,
}

impl TelemetryWorker {
    /// Deliver records until shutdown, then drain whatever is still queued.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::debug!(endpoint = %self.endpoint, "Telemetry worker started");
        loop {
            tokio::select! {
                maybe = self.rx.recv() => match maybe {
                    Some(record) => self.deliver(record).await,
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }

        // Flush records queued before shutdown was observed.
        self.rx.close();
        while let Some(record) = self.rx.recv().await {
            self.deliver(record).await;
        }
        tracing::debug!("Telemetry worker stopped");
    }

    async fn deliver(&self, record: TelemetryRecord) {
        let envelope = Envelope {
            instrumentation_key: &self.instrumentation_key,
            time_unix_ms: now_unix_ms(),
            record: &record,
        };
        match self
            .client
            .post(self.endpoint.clone())
            .json(&envelope)
            .send()
            .await
        {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    status = %response.status(),
                    "Telemetry backend rejected record"
                );
            }
            Ok(_) => tracing::trace!("Telemetry record delivered"),
            Err(error) => {
                tracing::warn!(error = %error, "Failed to deliver telemetry record");
            }
        }
    }
}
