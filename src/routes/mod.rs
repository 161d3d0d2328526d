//! HTTP route handlers for both services.
//!
//! The payslip router serves the landing page, the submission endpoint and a
//! liveness probe. Cross-origin requests are allowed from anywhere. The
//! landing page carries a short public Cache-Control, submission responses are
//! `no-store`.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;
pub mod keepalive;
pub mod submit;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HOME, CACHE_CONTROL_NO_STORE};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the payslip service router.
pub fn create_router(state: AppState) -> Router {
    let home_routes = Router::new().route("/", get(home::index)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HOME),
        ),
    );

    // Body limit applies to the whole multipart payload, attachment included
    let submit_routes = Router::new()
        .route("/submit-payslip", post(submit::submit_payslip))
        .layer(DefaultBodyLimit::max(state.config.submission.max_upload_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(home_routes)
        .merge(submit_routes)
        .merge(health_routes)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

/// Creates the keepalive service router.
pub fn create_keepalive_router() -> Router {
    Router::new()
        .route("/", get(keepalive::hello))
        .route("/health", get(health::health))
        .layer(middleware::from_fn(request_id_layer))
}
