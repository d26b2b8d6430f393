//! Built-in server for deployments without their own HTTP application.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Error type for the built-in webhook server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Webhook server error: {0}")]
    Server(#[source] io::Error),
}

/// Serves `router` on `0.0.0.0:{port}` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns [`ServeError::Bind`] if the port cannot be bound, or
/// [`ServeError::Server`] if the server fails while running.
pub async fn serve(
    router: Router,
    port: u16,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    serve_with_listener(listener, router, shutdown).await
}

/// Serves `router` on an already bound listener until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns [`ServeError::Server`] if the server fails while running.
pub async fn serve_with_listener(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Webhook server listening on {addr}");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(ServeError::Server)?;

    tracing::info!("Webhook server stopped");
    Ok(())
}
