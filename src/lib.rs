//! Payslip: pay slip submission service and keep-alive pinger.
//!
//! The payslip service validates multipart form submissions, stages the
//! optional PDF in a scoped temp file and emails a confirmation through an
//! SMTP relay. The keepalive service pings a remote deployment on a fixed
//! interval so it never idles down.

pub mod attachment;
pub mod config;
pub mod email;
pub mod error;
pub mod http;
pub mod mailer;
pub mod middleware;
pub mod pinger;
pub mod routes;
pub mod state;
pub mod submission;
pub mod telemetry;
pub mod templates;

pub use error::*;
