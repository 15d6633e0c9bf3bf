//! Logging and tracing infrastructure
//!
//! Installs a `tracing-subscriber` registry with an env filter and a text or
//! JSON formatting layer.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
