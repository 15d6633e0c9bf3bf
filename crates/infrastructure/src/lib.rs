//! Infrastructure layer - configuration and telemetry
//!
//! Loads [`AppConfig`] from defaults, an optional file and the environment,
//! and installs the process-wide tracing subscriber.

pub mod config;
pub mod telemetry;

pub use config::{AppConfig, DemoConfig, ENV_PREFIX, ServerConfig};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
