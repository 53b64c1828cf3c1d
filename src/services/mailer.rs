// src/services/mailer.rs

//! Change notification over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{MailConfig, ReportArtifact};

/// File name of the attached report.
pub const ATTACHMENT_NAME: &str = "report.pdf";

/// MIME type of the attached report.
pub const ATTACHMENT_TYPE: &str = "application/octet-stream";

/// Something that tells the recipient a new report is available.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one notification carrying the report.
    async fn notify(&self, artifact: &ReportArtifact) -> Result<()>;
}

/// Build the change email: fixed subject, plain-text body, PDF attached.
pub fn compose_message(config: &MailConfig, artifact: &ReportArtifact) -> Result<Message> {
    let from: Mailbox = config.sender.parse()?;
    let to: Mailbox = config.recipient.parse()?;
    let content_type = ContentType::parse(ATTACHMENT_TYPE).map_err(AppError::compose)?;

    let attachment = Attachment::new(ATTACHMENT_NAME.to_string())
        .body(artifact.as_bytes().to_vec(), content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(config.subject.as_str())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(config.body.clone()))
                .singlepart(attachment),
        )
        .map_err(AppError::compose)
}

/// Notifier submitting mail through an authenticated STARTTLS relay.
pub struct SmtpNotifier {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Create a notifier for the configured relay.
    ///
    /// No connection is opened until the first notification.
    pub fn new(config: MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { config, transport })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, artifact: &ReportArtifact) -> Result<()> {
        let message = compose_message(&self.config, artifact)?;
        self.transport.send(message).await?;
        log::info!(
            "Notification sent to {} via {}:{}",
            self.config.recipient,
            self.config.host,
            self.config.port
        );
        Ok(())
    }
}
