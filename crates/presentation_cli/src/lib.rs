//! failswitch CLI
//!
//! Thin client for the failpoint control plane. Every command maps to one
//! HTTP request; the response body is printed unchanged.

use clap::{Parser, Subcommand};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

/// Control plane address used when `--url` is not given
pub const DEFAULT_URL: &str = "http://127.0.0.1:1234";

/// failswitch CLI
#[derive(Debug, Parser)]
#[command(name = "failswitch-cli")]
#[command(author, version, about = "Inspect and control failpoints of a running process", long_about = None)]
pub struct Cli {
    /// Control plane URL
    #[arg(short, long, global = true, env = "FAILSWITCH_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// List every failpoint as `name=term`
    List,

    /// Show the term installed on a failpoint
    Get {
        /// Failpoint name
        name: String,
    },

    /// Show how often a failpoint was hit since its term was installed
    Count {
        /// Failpoint name
        name: String,
    },

    /// Install a term on a failpoint
    ///
    /// Example: failswitch-cli set ExampleString '1*return("boom")->off'
    Set {
        /// Failpoint name
        name: String,
        /// Term, e.g. `50%3*sleep(100ms)->off`
        spec: String,
    },

    /// Install several terms at once
    ///
    /// Example: failswitch-cli set-many 'ExampleString=return;ExampleLabels=off'
    SetMany {
        /// `name=term` pairs separated by `;`
        assignments: String,
    },

    /// Disable a failpoint
    Deactivate {
        /// Failpoint name
        name: String,
    },
}

/// Status and body of a control-plane response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status
    pub status: StatusCode,
    /// Raw response body
    pub body: String,
}

impl Reply {
    /// Whether the server accepted the request
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build `base` with `segments` appended as percent-encoded path segments
pub fn endpoint_url(base: &str, segments: &[&str]) -> anyhow::Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send the request for `command` and collect the reply
pub async fn execute(client: &Client, base: &str, command: &Commands) -> anyhow::Result<Reply> {
    let request = match command {
        Commands::List => client.get(endpoint_url(base, &[])?),
        Commands::Get { name } => client.get(endpoint_url(base, &[name.as_str()])?),
        Commands::Count { name } => client.get(endpoint_url(base, &[name.as_str(), "count"])?),
        Commands::Set { name, spec } => client
            .put(endpoint_url(base, &[name.as_str()])?)
            .body(spec.clone()),
        Commands::SetMany { assignments } => client
            .put(endpoint_url(base, &["failpoints"])?)
            .body(assignments.clone()),
        Commands::Deactivate { name } => client.delete(endpoint_url(base, &[name.as_str()])?),
    };

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    debug!(%status, bytes = body.len(), "Control plane replied");
    Ok(Reply { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_levels() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(9), "trace");
    }

    #[test]
    fn endpoint_url_appends_segments() {
        assert_eq!(
            endpoint_url("http://localhost:1234", &[]).unwrap().as_str(),
            "http://localhost:1234/"
        );
        assert_eq!(
            endpoint_url("http://localhost:1234/", &["ExampleString", "count"])
                .unwrap()
                .as_str(),
            "http://localhost:1234/ExampleString/count"
        );
    }

    #[test]
    fn endpoint_url_encodes_names() {
        assert_eq!(
            endpoint_url("http://localhost:1234", &["a?b#c"]).unwrap().as_str(),
            "http://localhost:1234/a%3Fb%23c"
        );
    }

    #[test]
    fn endpoint_url_rejects_garbage() {
        assert!(endpoint_url("not a url", &[]).is_err());
        assert!(endpoint_url("mailto:someone@example.com", &["x"]).is_err());
    }
}
