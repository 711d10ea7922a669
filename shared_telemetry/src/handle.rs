use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use tokio::runtime::{Handle, Runtime};

use crate::bus::{EventPublisher, EventRecord};
use crate::logging::{JsonLogger, LogLevel, LogRecord};

/// Builder configuring a telemetry handle for one subsystem.
pub struct TelemetryBuilder {
    source: String,
    log_path: Option<PathBuf>,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl TelemetryBuilder {
    /// Creates a new builder for the named subsystem.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            log_path: None,
            event_publisher: None,
        }
    }

    /// Sets the JSON log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Assigns the event publisher.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> Result<Telemetry> {
        Telemetry::new(self.source, self.log_path, self.event_publisher)
    }
}

/// Telemetry handle combining a structured logger and an event publisher.
///
/// Cheap to clone; all sinks are optional so runtimes can run silent.
#[derive(Clone)]
pub struct Telemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("source", &self.inner.source)
            .finish()
    }
}

struct TelemetryInner {
    source: String,
    logger: Option<JsonLogger>,
    events: Option<EventHandle>,
}

struct EventHandle {
    runtime: Runtime,
    publisher: Arc<dyn EventPublisher>,
}

impl EventHandle {
    fn new(publisher: Arc<dyn EventPublisher>) -> Result<Self> {
        Ok(Self {
            runtime: Runtime::new()?,
            publisher,
        })
    }

    fn publish(&self, record: EventRecord) -> Result<()> {
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(&self.publisher);
            handle.spawn(async move {
                if let Err(err) = publisher.publish(record).await {
                    eprintln!("telemetry event publish failed: {err:?}");
                }
            });
            Ok(())
        } else {
            self.runtime.block_on(self.publisher.publish(record))
        }
    }
}

impl Telemetry {
    fn new(
        source: impl Into<String>,
        log_path: Option<PathBuf>,
        event_publisher: Option<Arc<dyn EventPublisher>>,
    ) -> Result<Self> {
        let source = source.into();
        let logger = log_path.map(JsonLogger::new).transpose()?;
        let events = event_publisher.map(EventHandle::new).transpose()?;
        Ok(Self {
            inner: Arc::new(TelemetryInner {
                source,
                logger,
                events,
            }),
        })
    }

    /// Entry point for configuring telemetry.
    #[must_use]
    pub fn builder(source: impl Into<String>) -> TelemetryBuilder {
        TelemetryBuilder::new(source)
    }

    /// Subsystem name this handle reports for.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// Writes a structured log line. No-op without a configured log path.
    pub fn log(&self, level: LogLevel, message: &str, fields: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record =
                LogRecord::new(self.inner.source.clone(), level, message).with_fields(fields);
            logger.log(&record)?;
        }
        Ok(())
    }

    /// Publishes an event to the bus. No-op without a configured publisher.
    pub fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        if let Some(events) = &self.inner.events {
            events.publish(EventRecord::new(
                self.inner.source.clone(),
                event_type,
                payload,
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryEventBus;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn silent_handle_is_a_noop() {
        let telemetry = Telemetry::builder("patterns").build().unwrap();
        telemetry
            .log(LogLevel::Info, "patterns.store", json!({}))
            .unwrap();
        telemetry.event("patterns.store", json!({})).unwrap();
    }

    #[test]
    fn logs_and_publishes_when_configured() {
        let dir = tempdir().unwrap();
        let bus = Arc::new(MemoryEventBus::new(4));
        let telemetry = Telemetry::builder("tiers")
            .log_path(dir.path().join("tiers.log"))
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "tiers.attend", json!({ "loaded": 2 }))
            .unwrap();
        telemetry
            .event("tiers.attend", json!({ "loaded": 2 }))
            .unwrap();
        let content = std::fs::read_to_string(dir.path().join("tiers.log")).unwrap();
        assert!(content.contains("tiers.attend"));
        assert_eq!(bus.snapshot().len(), 1);
        assert_eq!(bus.snapshot()[0].source, "tiers");
    }
}
