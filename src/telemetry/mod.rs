//! Telemetry for the harness: structured logging and per-run spans.

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{RunSpan, SpanExt};
