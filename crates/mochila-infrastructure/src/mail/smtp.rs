use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mochila_core::error::{MochilaError, Result};
use mochila_core::mail::{VerificationEmail, VerificationMailer};

use crate::config::SmtpSettings;

/// Sends verification mail through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self> {
        let builder = if settings.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MochilaError::config(format!("Invalid SMTP host {}: {}", settings.host, e)))?;

        let mut builder = builder.port(settings.port);
        if !settings.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ));
        }

        let from = from
            .parse::<Mailbox>()
            .map_err(|e| MochilaError::config(format!("Invalid sender address {}: {}", from, e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
            host: settings.host.clone(),
        })
    }

    fn build_message(&self, email: &VerificationEmail, message_id: &str) -> Result<Message> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| MochilaError::validation(format!("Invalid recipient address: {}", e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .message_id(Some(message_id.to_string()))
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| MochilaError::mail(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl VerificationMailer for SmtpMailer {
    async fn send(&self, email: &VerificationEmail) -> Result<String> {
        let message_id = format!("<{}@mochila>", uuid::Uuid::new_v4());
        let message = self.build_message(email, &message_id)?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!(host = %self.host, error = %e, "SMTP delivery failed");
            MochilaError::mail(format!("Failed to send email: {}", e))
        })?;

        tracing::info!(to = %email.to, message_id = %message_id, "Verification email sent");
        Ok(message_id)
    }

    fn describe(&self) -> String {
        format!("smtp:{}", self.host)
    }
}
