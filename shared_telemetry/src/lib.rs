#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSON logging and event-bus telemetry shared across the Holo memory stack.

/// Event bus abstractions for module-to-module notifications.
pub mod bus;
/// Reusable telemetry handle combining a logger and an event publisher.
pub mod handle;
/// Structured JSON-lines logging.
pub mod logging;

pub use bus::{EventPublisher, EventRecord, EventSubscriber, FileEventPublisher, MemoryEventBus};
pub use handle::{Telemetry, TelemetryBuilder};
pub use logging::{JsonLogger, LogLevel, LogRecord};
