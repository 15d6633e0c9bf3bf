//! Control-plane HTTP server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Control-plane HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in bytes (default: 64KiB)
    #[serde(default = "default_max_body")]
    pub max_body_bytes: usize,

    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

pub(super) fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    1234
}

const fn default_max_body() -> usize {
    64 * 1024
}

const fn default_shutdown_timeout() -> u64 {
    30
}

impl ServerConfig {
    /// `host:port` to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}
