//! Confirmation email composition.

use tera::Tera;

use crate::config::{ATTACHMENT_CONTENT_TYPE, ATTACHMENT_FILENAME};
use crate::submission::PaySlip;

/// Template rendered into the HTML body
pub const CONFIRMATION_TEMPLATE: &str = "email/confirmation.html";

/// A file attached to an outbound email
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Message handed to a [`crate::mailer::Mailer`]
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<EmailAttachment>,
}

pub fn confirmation_subject(slip: &PaySlip) -> String {
    format!("Pay Slip Confirmation - {}", slip.name)
}

/// Build the confirmation for `slip`, attaching `pdf` as `payslip.pdf` if given.
pub fn compose_confirmation(
    tera: &Tera,
    slip: &PaySlip,
    pdf: Option<Vec<u8>>,
) -> Result<OutboundEmail, tera::Error> {
    let mut context = tera::Context::new();
    context.insert("slip", slip);
    context.insert("has_attachment", &pdf.is_some());
    let html_body = tera.render(CONFIRMATION_TEMPLATE, &context)?;

    Ok(OutboundEmail {
        to: slip.email.clone(),
        subject: confirmation_subject(slip),
        html_body,
        attachment: pdf.map(|content| EmailAttachment {
            filename: ATTACHMENT_FILENAME.to_string(),
            content_type: ATTACHMENT_CONTENT_TYPE.to_string(),
            content,
        }),
    })
}
