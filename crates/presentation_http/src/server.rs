//! Server task lifecycle
//!
//! Each router runs in its own task and stops once the shared watch channel
//! flips to `true`.

use axum::Router;
use tokio::{
    net::TcpListener,
    sync::watch,
    task::{JoinError, JoinHandle},
};
use tracing::{error, info};

/// Outcome of a server task
pub type ServerExit = Result<std::io::Result<()>, JoinError>;

/// Serve `app` on `listener` until `shutdown` becomes `true`
pub fn spawn_server(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await
    })
}

/// Log how a server task ended
///
/// `unexpected` marks a stop before shutdown was requested. Returns whether
/// the task ended cleanly.
pub fn report_exit(server: &str, result: ServerExit, unexpected: bool) -> bool {
    match result {
        Ok(Ok(())) if unexpected => {
            error!("{} stopped unexpectedly", server);
            false
        },
        Ok(Ok(())) => {
            info!("{} stopped", server);
            true
        },
        Ok(Err(e)) => {
            error!("{} failed: {}", server, e);
            false
        },
        Err(e) => {
            error!("{} task failed: {}", server, e);
            false
        },
    }
}
