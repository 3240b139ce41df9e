//! Verification code delivery.

use mochila_core::error::{MochilaError, Result};
use mochila_core::mail::{VerificationEmail, VerificationMailer};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub struct VerificationService {
    mailer: Arc<dyn VerificationMailer>,
}

impl VerificationService {
    pub fn new(mailer: Arc<dyn VerificationMailer>) -> Self {
        Self { mailer }
    }

    /// Sends `code` to `email` and returns the transport's message id.
    pub async fn send_code(
        &self,
        email: Option<&str>,
        code: Option<&str>,
        subject: Option<String>,
    ) -> Result<String> {
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let code = code.map(str::trim).filter(|c| !c.is_empty());
        let (Some(email), Some(code)) = (email, code) else {
            return Err(MochilaError::validation("Email and code are required"));
        };
        if !EMAIL_PATTERN.is_match(email) {
            return Err(MochilaError::validation("Invalid email format"));
        }

        let message = VerificationEmail::new(email, code, subject);
        let message_id = self.mailer.send(&message).await?;
        tracing::info!(
            to = %email,
            transport = %self.mailer.describe(),
            message_id = %message_id,
            "Verification email dispatched"
        );
        Ok(message_id)
    }
}
