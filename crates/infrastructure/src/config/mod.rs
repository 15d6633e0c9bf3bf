//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: control-plane HTTP server settings
//! - `demo`: demo call server settings
//!
//! Telemetry settings live with the subscriber setup in
//! [`crate::telemetry`].

mod demo;
mod server;

use application::{ApplicationError, FailpointRegistry};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::telemetry::TelemetryConfig;

pub use demo::DemoConfig;
pub use server::ServerConfig;

/// Prefix for environment overrides (e.g., `FAILSWITCH_SERVER__PORT`)
pub const ENV_PREFIX: &str = "FAILSWITCH";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Control-plane server
    #[serde(default)]
    pub server: ServerConfig,

    /// Demo call server
    #[serde(default)]
    pub demo: DemoConfig,

    /// Terms to activate at startup, as `name=term;name=term`
    #[serde(default)]
    pub failpoints: String,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Builder preloaded with the built-in defaults
    pub fn builder() -> Result<config::ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 1234)?
            .set_default("demo.port", 8080)?
            .set_default("failpoints", "")
    }

    /// Load configuration from defaults, an optional `config.toml` and the
    /// environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = Self::builder()?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., FAILSWITCH_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Apply the startup `failpoints` assignments to `registry`
    ///
    /// Every well-formed pair is applied even when others fail; the first
    /// failure is returned.
    pub fn activate_failpoints(&self, registry: &FailpointRegistry) -> Result<(), ApplicationError> {
        if self.failpoints.trim().is_empty() {
            return Ok(());
        }

        info!(failpoints = %self.failpoints, "Activating failpoints from configuration");
        registry.set_from_assignments(&self.failpoints).inspect_err(|e| {
            warn!(error = %e, "Some configured failpoints could not be activated");
        })
    }
}
