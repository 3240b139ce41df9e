use async_trait::async_trait;
use mochila_core::error::Result;
use mochila_core::mail::{VerificationEmail, VerificationMailer};

/// Logs the message instead of delivering it. Used when no SMTP
/// transport is configured.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VerificationMailer for ConsoleMailer {
    async fn send(&self, email: &VerificationEmail) -> Result<String> {
        let message_id = format!("console-{}", uuid::Uuid::new_v4());
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            code = %email.code,
            message_id = %message_id,
            "Verification email (console transport)"
        );
        Ok(message_id)
    }

    fn describe(&self) -> String {
        "console".to_string()
    }
}
