//! failswitch CLI
//!
//! Command-line interface for the failpoint control plane.

#![allow(clippy::print_stdout)]

use clap::Parser;
use presentation_cli::{Cli, execute, log_filter_from_verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(cli.verbose)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = reqwest::Client::new();
    let reply = execute(&client, &cli.url, &cli.command).await?;

    print!("{}", reply.body);
    if !reply.body.is_empty() && !reply.body.ends_with('\n') {
        println!();
    }

    if !reply.is_success() {
        tracing::warn!(status = %reply.status, "Request failed");
        std::process::exit(1);
    }
    Ok(())
}
