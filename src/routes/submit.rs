//! Pay slip submission handler.
//!
//! The whole multipart body is read into memory first (bounded by the body
//! limit layer) so validation can see every field before anything is written
//! to disk. Only a validated attachment is staged, and the staged file is
//! released after the send attempt whether or not delivery succeeded.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    Json,
};
use chrono::Local;
use serde::Serialize;
use tracing::instrument;

use crate::attachment::StagedAttachment;
use crate::email::compose_confirmation;
use crate::error::AppError;
use crate::state::AppState;
use crate::submission::{
    PaySlip, Submission, SubmissionForm, Upload, ATTACHMENT_FIELD, REQUIRED_FIELDS,
};

pub const SUCCESS_MESSAGE: &str = "Pay slip submitted successfully and sent to email";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
}

/// Handler for `POST /submit-payslip`
#[instrument(name = "submit::submit_payslip", skip(state, multipart))]
pub async fn submit_payslip(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let form = read_form(multipart?).await?;

    let Submission { slip, attachment } = form.validate(Local::now().date_naive())?;
    tracing::info!(
        student_id = %slip.student_id,
        has_attachment = attachment.is_some(),
        "Pay slip validated"
    );

    let staged = match attachment {
        Some(upload) => Some(
            StagedAttachment::stage_blocking(
                state.config.submission.staging_dir.clone(),
                upload.content,
            )
            .await?,
        ),
        None => None,
    };

    let outcome = send_confirmation(&state, &slip, staged.as_ref()).await;
    if let Some(staged) = staged {
        staged.discard();
    }
    outcome?;

    tracing::info!(student_id = %slip.student_id, "Pay slip confirmation sent");
    Ok(Json(SubmitResponse {
        message: SUCCESS_MESSAGE,
    }))
}

/// Collect the known text fields and the optional file part. Later duplicates
/// replace earlier ones; unknown parts are skipped.
async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == ATTACHMENT_FIELD {
            form.pdf_file = Some(read_upload(field).await?);
        } else if REQUIRED_FIELDS.contains(&name.as_str()) {
            let value = field.text().await?;
            form.set_text(&name, value);
        } else {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(form)
}

async fn read_upload(field: Field<'_>) -> Result<Upload, AppError> {
    let filename = field.file_name().unwrap_or_default().to_owned();
    let content = field.bytes().await?;
    tracing::debug!(%filename, bytes = content.len(), "Received upload");
    Ok(Upload { filename, content })
}

async fn send_confirmation(
    state: &AppState,
    slip: &PaySlip,
    staged: Option<&StagedAttachment>,
) -> Result<(), AppError> {
    let pdf = match staged {
        Some(staged) => Some(staged.read().await?),
        None => None,
    };

    let email = compose_confirmation(&state.tera, slip, pdf)?;
    state.mailer.send(email).await?;
    Ok(())
}
