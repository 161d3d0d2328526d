//! Shared helpers for the HTTP-level tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;

use payslip::config::AppConfig;
use payslip::email::OutboundEmail;
use payslip::mailer::{MailError, Mailer};
use payslip::routes::create_router;
use payslip::state::AppState;
use payslip::templates::init_templates;

pub const BOUNDARY: &str = "payslip-test-boundary";

/// Fields from a complete, valid submission
pub const VALID_FIELDS: [(&str, &str); 8] = [
    ("name", "Asha"),
    ("email", "a@x.com"),
    ("student_id", "S1"),
    ("department", "CS"),
    ("year", "2"),
    ("amount", "5000.50"),
    ("payment_date", "2024-01-01"),
    ("purpose", "Fees"),
];

/// Records every email instead of sending it
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Behaves like a relay that refuses every message
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutboundEmail) -> Result<(), MailError> {
        Err(MailError::Rejected("relay refused connection".to_string()))
    }
}

/// Build the payslip router with `mailer`, staging uploads in `staging_dir`.
pub fn test_app(mailer: Arc<dyn Mailer>, staging_dir: &Path) -> Router {
    let mut config = AppConfig::default();
    config.submission.staging_dir = Some(staging_dir.to_path_buf());

    let tera = init_templates().expect("templates should load");
    create_router(AppState::new(config, tera, mailer))
}

pub struct FilePart<'a> {
    pub filename: &'a str,
    pub content: &'a [u8],
}

/// Encode `fields` and an optional `pdf_file` part as multipart/form-data.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"pdf_file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn submit_request(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit-payslip")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap()
}

/// `VALID_FIELDS` with `overrides` replacing matching names
pub fn fields_with<'a>(overrides: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    VALID_FIELDS
        .iter()
        .map(|(name, value)| {
            overrides
                .iter()
                .find(|(n, _)| n == name)
                .map(|(n, v)| (*n, *v))
                .unwrap_or((*name, *value))
        })
        .collect()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response should be valid JSON")
}

pub fn staged_files(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .expect("staging dir should exist")
        .map(|entry| entry.unwrap().path())
        .collect()
}
