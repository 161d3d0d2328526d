use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::io;

use crate::mailer::MailError;
use crate::submission::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to send email: {0}")]
    Mail(#[from] MailError),

    #[error("Invalid form data: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("Invalid form data: {}", .0.body_text())]
    MultipartRejected(#[from] MultipartRejection),

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(e) => e.status(),
            AppError::Multipart(e) => e.status(),
            AppError::MultipartRejected(e) => e.status(),
            AppError::Mail(_) | AppError::Template(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Errors render as `{"detail": "..."}` with the matching status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::info!(status = status.as_u16(), %detail, "Request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_message() {
        let err = AppError::from(ValidationError::MissingFields(vec!["name", "amount"]));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "Missing required fields: name, amount");

        let err = AppError::from(ValidationError::NotPdf);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn mail_errors_are_server_errors() {
        let err = AppError::from(MailError::Rejected("connection refused".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to send email: connection refused");
    }

    #[tokio::test]
    async fn response_body_is_detail_json() {
        let response = AppError::from(ValidationError::InvalidAmount).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value["detail"],
            "Amount must be a valid number (e.g., 5000 or 5000.50)"
        );
    }
}
