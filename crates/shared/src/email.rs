//! Email service for sending lead notifications.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Outgoing message before it is turned into a MIME message.
#[derive(Debug, Clone)]
pub struct OutgoingEmail<'a> {
    /// Recipient address.
    pub to: &'a str,
    /// Optional `Reply-To` mailbox (`Name <address>` or bare address).
    pub reply_to: Option<&'a str>,
    /// Subject line.
    pub subject: &'a str,
    /// Plain-text body.
    pub body: &'a str,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("smtp_host", &self.config.smtp_host)
            .field("smtp_port", &self.config.smtp_port)
            .field("smtp_password", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Inbox that receives lead notifications.
    #[must_use]
    pub fn notify_address(&self) -> &str {
        &self.config.notify_email
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = if self.config.smtp_username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
                .credentials(Credentials::new(
                    self.config.smtp_username.clone(),
                    self.config.smtp_password.clone(),
                ))
        };

        Ok(builder.port(self.config.smtp_port).build())
    }

    /// Builds the MIME message for an outgoing email.
    ///
    /// # Errors
    ///
    /// Returns an error if an address cannot be parsed or the message cannot
    /// be assembled.
    pub fn build_message(&self, email: &OutgoingEmail<'_>) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let mut builder = Message::builder()
            .from(parse_mailbox(&from)?)
            .to(parse_mailbox(email.to)?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN);

        if let Some(reply_to) = email.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        builder
            .body(email.body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends a lead notification to the configured inbox, replying to the
    /// person who submitted the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_lead_notification(
        &self,
        reply_to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = OutgoingEmail {
            to: &self.config.notify_email,
            reply_to: Some(reply_to),
            subject,
            body,
        };
        self.send(&email).await
    }

    /// Sends a generic email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send(&self, email: &OutgoingEmail<'_>) -> Result<(), EmailError> {
        let message = self.build_message(email)?;

        let transport = self.create_transport()?;
        transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

fn parse_mailbox(value: &str) -> Result<Mailbox, EmailError> {
    value
        .parse()
        .map_err(|e| EmailError::InvalidAddress(format!("{value}: {e}")))
}
