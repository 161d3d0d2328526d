//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {addr}: {reason}")]
    Address { addr: String, reason: String },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Parse `host:port` into a socket address.
pub fn listen_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let addr = format!("{}:{}", host, port);
    addr.parse().map_err(|e: std::net::AddrParseError| ServerError::Address {
        addr,
        reason: e.to_string(),
    })
}

/// Start the HTTP server on `host:port`.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, host: &str, port: u16) -> Result<(), ServerError> {
    let addr = listen_addr(host, port)?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    shutdown::setup_shutdown_handler(handle.clone());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
