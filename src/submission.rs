//! Pay slip submissions: raw form data and the validation pipeline.
//!
//! Validation runs in a fixed order and stops at the first failing stage:
//! required fields, then the amount, then the attachment's file type. Nothing
//! touches the disk or the mail relay until [`SubmissionForm::validate`]
//! returns `Ok`.

use axum::body::Bytes;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Serialize;

/// Required text fields, in the order they are reported when missing
pub const REQUIRED_FIELDS: [&str; 8] = [
    "name",
    "email",
    "student_id",
    "department",
    "year",
    "amount",
    "payment_date",
    "purpose",
];

/// Multipart field carrying the optional proof-of-payment file
pub const ATTACHMENT_FIELD: &str = "pdf_file";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Amount must be a valid number (e.g., 5000 or 5000.50)")]
    InvalidAmount,

    #[error("Uploaded file must be a PDF")]
    NotPdf,
}

impl ValidationError {
    pub fn status(&self) -> StatusCode {
        match self {
            ValidationError::MissingFields(_) | ValidationError::InvalidAmount => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ValidationError::NotPdf => StatusCode::BAD_REQUEST,
        }
    }
}

/// An uploaded file held in memory until validation passes
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.filename.to_lowercase().ends_with(".pdf")
    }

    /// Browsers send an empty, unnamed part for an untouched file input.
    fn is_blank(&self) -> bool {
        self.filename.is_empty() && self.content.is_empty()
    }
}

/// Raw fields as they arrived in the request
#[derive(Debug, Default, Clone)]
pub struct SubmissionForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub amount: Option<String>,
    pub payment_date: Option<String>,
    pub purpose: Option<String>,
    pub pdf_file: Option<Upload>,
}

impl SubmissionForm {
    /// Store a text field. Returns `false` for names the form does not know.
    pub fn set_text(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "student_id" => &mut self.student_id,
            "department" => &mut self.department,
            "year" => &mut self.year,
            "amount" => &mut self.amount,
            "payment_date" => &mut self.payment_date,
            "purpose" => &mut self.purpose,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    fn text(&self, field: &str) -> Option<&str> {
        let value = match field {
            "name" => &self.name,
            "email" => &self.email,
            "student_id" => &self.student_id,
            "department" => &self.department,
            "year" => &self.year,
            "amount" => &self.amount,
            "payment_date" => &self.payment_date,
            "purpose" => &self.purpose,
            _ => return None,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Names of required fields that are absent or empty, in canonical order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| self.text(field).is_none())
            .collect()
    }

    /// Run the validation pipeline. `today` becomes the slip's generated date.
    pub fn validate(self, today: NaiveDate) -> Result<Submission, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let amount = self
            .amount
            .as_deref()
            .and_then(parse_amount)
            .ok_or(ValidationError::InvalidAmount)?;

        let attachment = self.pdf_file.filter(|upload| !upload.is_blank());
        if let Some(upload) = &attachment {
            if !upload.is_pdf() {
                return Err(ValidationError::NotPdf);
            }
        }

        let slip = PaySlip {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            student_id: self.student_id.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            amount,
            payment_date: self.payment_date.unwrap_or_default(),
            purpose: self.purpose.unwrap_or_default(),
            generated_date: today,
        };

        Ok(Submission { slip, attachment })
    }
}

/// Parse a decimal amount, rejecting NaN and infinities.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// Validated pay slip details
#[derive(Debug, Clone, Serialize)]
pub struct PaySlip {
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub department: String,
    pub year: String,
    pub amount: f64,
    pub payment_date: String,
    pub purpose: String,
    pub generated_date: NaiveDate,
}

/// Output of a successful validation
#[derive(Debug, Clone)]
pub struct Submission {
    pub slip: PaySlip,
    pub attachment: Option<Upload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn complete_form() -> SubmissionForm {
        let mut form = SubmissionForm::default();
        for (field, value) in [
            ("name", "Asha"),
            ("email", "a@x.com"),
            ("student_id", "S1"),
            ("department", "CS"),
            ("year", "2"),
            ("amount", "5000.50"),
            ("payment_date", "2024-01-01"),
            ("purpose", "Fees"),
        ] {
            assert!(form.set_text(field, value.to_string()));
        }
        form
    }

    #[test]
    fn empty_form_reports_every_field_in_order() {
        let err = SubmissionForm::default().validate(today()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: name, email, student_id, department, year, amount, payment_date, purpose"
        );
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let mut form = complete_form();
        form.set_text("email", String::new());
        form.set_text("purpose", String::new());

        let err = form.validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["email", "purpose"]));
    }

    #[test]
    fn missing_fields_win_over_bad_amount() {
        let mut form = complete_form();
        form.set_text("amount", "abc".to_string());
        form.name = None;

        let err = form.validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["name"]));
    }

    #[test]
    fn unknown_fields_are_not_stored() {
        let mut form = SubmissionForm::default();
        assert!(!form.set_text("nickname", "A".to_string()));
        assert_eq!(form.missing_fields().len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn amount_parsing() {
        assert_eq!(parse_amount("5000"), Some(5000.0));
        assert_eq!(parse_amount("5000.50"), Some(5000.5));
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount("1e3"), Some(1000.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("5,000"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn invalid_amount_is_unprocessable() {
        let mut form = complete_form();
        form.set_text("amount", "abc".to_string());

        let err = form.validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmount);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn pdf_extension_check_ignores_case() {
        assert!(Upload::new("slip.PDF", "x").is_pdf());
        assert!(Upload::new("slip.pdf", "x").is_pdf());
        assert!(!Upload::new("resume.docx", "x").is_pdf());
        assert!(!Upload::new("pdf", "x").is_pdf());
    }

    #[test]
    fn non_pdf_attachment_is_bad_request() {
        let mut form = complete_form();
        form.pdf_file = Some(Upload::new("resume.docx", "PK"));

        let err = form.validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::NotPdf);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bad_amount_is_reported_before_file_type() {
        let mut form = complete_form();
        form.set_text("amount", "lots".to_string());
        form.pdf_file = Some(Upload::new("resume.docx", "PK"));

        assert_eq!(
            form.validate(today()).unwrap_err(),
            ValidationError::InvalidAmount
        );
    }

    #[test]
    fn blank_file_part_counts_as_no_attachment() {
        let mut form = complete_form();
        form.pdf_file = Some(Upload::new("", Bytes::new()));

        let submission = form.validate(today()).unwrap();
        assert!(submission.attachment.is_none());
    }

    #[test]
    fn valid_form_produces_slip() {
        let mut form = complete_form();
        form.pdf_file = Some(Upload::new("slip.PDF", "%PDF-1.4"));

        let submission = form.validate(today()).unwrap();
        assert_eq!(submission.slip.name, "Asha");
        assert_eq!(submission.slip.amount, 5000.5);
        assert_eq!(submission.slip.generated_date, today());
        assert_eq!(submission.attachment.unwrap().filename, "slip.PDF");
    }
}
