//! Root endpoint of the keepalive service.

use axum::Json;
use serde::Serialize;

pub const HELLO_MESSAGE: &str = "Hello, World!";

#[derive(Debug, Serialize)]
pub struct Hello {
    pub message: &'static str,
}

/// Constant payload, used as the ping target by other deployments.
pub async fn hello() -> Json<Hello> {
    Json(Hello {
        message: HELLO_MESSAGE,
    })
}
