//! failswitch HTTP server
//!
//! Serves the failpoint control plane and, when enabled, the demo call
//! server. Both share one registry.

use std::sync::Arc;

use application::FailpointRegistry;
use infrastructure::{AppConfig, init_telemetry};
use presentation_http::{
    AppState, FAILPOINT_NAMES, routes,
    server::{report_exit, spawn_server},
};
use tokio::{net::TcpListener, signal, sync::watch};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_telemetry(&config.telemetry)?;
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!("failswitch v{} starting...", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(FailpointRegistry::new(FAILPOINT_NAMES)?);
    if let Err(e) = config.activate_failpoints(&registry) {
        warn!(error = %e, "Continuing with partially activated failpoints");
    }

    let state = AppState::new(Arc::clone(&registry));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let control_app = routes::create_router(state.clone())
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http());
    let control_addr = config.server.bind_address();
    let control_listener = TcpListener::bind(&control_addr).await?;
    info!("Failpoint control plane listening on http://{}", control_addr);
    let mut control = spawn_server(control_listener, control_app, shutdown_rx.clone());

    let mut demo = if config.demo.enabled {
        let demo_app = routes::create_demo_router(state).layer(TraceLayer::new_for_http());
        let demo_addr = config.demo.bind_address();
        let demo_listener = TcpListener::bind(&demo_addr).await?;
        info!("Demo call server listening on http://{}/call/{{function}}", demo_addr);
        Some(spawn_server(demo_listener, demo_app, shutdown_rx))
    } else {
        None
    };

    let demo_stopped = async {
        match demo.as_mut() {
            Some(handle) => handle.await,
            None => std::future::pending().await,
        }
    };

    let mut demo_finished = false;
    tokio::select! {
        () = shutdown_signal() => {},
        result = &mut control => {
            report_exit("Control plane", result, true);
        },
        result = demo_stopped => {
            demo_finished = true;
            report_exit("Demo call server", result, true);
        },
    }

    let _ = shutdown_tx.send(true);
    let timeout = config.server.shutdown_timeout();
    info!("Waiting up to {:?} for connections to close...", timeout);

    let drain = async {
        if !control.is_finished() {
            report_exit("Control plane", control.await, false);
        }
        if let Some(demo) = demo.filter(|_| !demo_finished) {
            report_exit("Demo call server", demo.await, false);
        }
    };
    if tokio::time::timeout(timeout, drain).await.is_err() {
        warn!("Shutdown timeout elapsed with connections still open");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        // Log error but continue waiting
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
