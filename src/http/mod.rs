//! HTTP server startup and graceful shutdown.
//!
//! Both services run plain HTTP; TLS is expected to terminate at the hosting
//! platform or a reverse proxy. On SIGTERM/SIGINT the server stops accepting
//! connections and drains in-flight requests.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
