//! Outbound mail delivery.
//!
//! Handlers talk to a [`Mailer`] trait object so the SMTP relay can be swapped
//! out in tests. [`SmtpMailer`] is the production implementation on top of
//! lettre's async SMTP transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpConfig, SmtpSecurity};
use crate::email::OutboundEmail;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("no sender address configured (set smtp.sender or SMTP_USER)")]
    MissingSender,

    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Delivery refused by a non-SMTP mailer. Not produced by [`SmtpMailer`];
    /// available to other [`Mailer`] implementations.
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

/// Sends mail through an SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Option<Mailbox>,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    ///
    /// A missing sender address is not an error here: the mailer is still
    /// built and every send fails with [`MailError::MissingSender`].
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let sender = match config.sender_address() {
            Some(address) => {
                let address: Address = address.parse()?;
                Some(Mailbox::new(Some(config.sender_name.clone()), address))
            }
            None => None,
        };

        let builder = match config.security {
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };
        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    pub fn sender(&self) -> Option<&Mailbox> {
        self.sender.as_ref()
    }

    /// Convert an [`OutboundEmail`] into a MIME message from this mailer's sender.
    pub fn build_message(&self, email: OutboundEmail) -> Result<Message, MailError> {
        let sender = self.sender.clone().ok_or(MailError::MissingSender)?;
        let to: Mailbox = email.to.trim().parse()?;
        let builder = Message::builder()
            .from(sender)
            .to(to)
            .subject(email.subject);

        let html = SinglePart::html(email.html_body);
        let message = match email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)?;
                let part = Attachment::new(attachment.filename).body(attachment.content, content_type);
                builder.multipart(MultiPart::mixed().singlepart(html).singlepart(part))?
            }
            None => builder.singlepart(html)?,
        };
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "mailer::send", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        let response = self.transport.send(message).await?;
        tracing::info!(code = %response.code(), "Email accepted by relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::EmailAttachment;

    fn config() -> SmtpConfig {
        SmtpConfig {
            username: Some("finance@example.org".to_string()),
            password: Some("secret".to_string()),
            ..SmtpConfig::default()
        }
    }

    fn email(attachment: Option<EmailAttachment>) -> OutboundEmail {
        OutboundEmail {
            to: "a@x.com".to_string(),
            subject: "Pay Slip Confirmation - Asha".to_string(),
            html_body: "<p>Dear Asha</p>".to_string(),
            attachment,
        }
    }

    #[tokio::test]
    async fn builds_without_a_sender_but_cannot_send() {
        let mailer = SmtpMailer::new(&SmtpConfig::default()).unwrap();
        assert!(mailer.sender().is_none());

        let err = mailer.build_message(email(None)).unwrap_err();
        assert!(matches!(err, MailError::MissingSender));

        let err = mailer.send(email(None)).await.unwrap_err();
        assert!(matches!(err, MailError::MissingSender));
    }

    #[tokio::test]
    async fn sender_uses_display_name() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let sender = mailer.sender().unwrap();
        assert_eq!(sender.email.to_string(), "finance@example.org");
        assert_eq!(sender.name.as_deref(), Some("Pay Slip System"));
    }

    #[tokio::test]
    async fn plain_message_has_html_body() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let message = mailer.build_message(email(None)).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: a@x.com"));
        assert!(raw.contains("Subject: Pay Slip Confirmation - Asha"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn attachment_is_a_separate_part() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let message = mailer
            .build_message(email(Some(EmailAttachment {
                filename: "payslip.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                content: b"%PDF-1.4".to_vec(),
            })))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("Content-Type: application/pdf"));
        assert!(raw.contains("Content-Disposition: attachment"));
        assert!(raw.contains("payslip.pdf"));
    }

    #[tokio::test]
    async fn unparseable_recipient_is_an_error() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let mut bad = email(None);
        bad.to = "not an address".to_string();
        assert!(matches!(mailer.build_message(bad), Err(MailError::Address(_))));
    }
}
