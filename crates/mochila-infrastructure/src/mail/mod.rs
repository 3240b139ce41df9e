//! Verification mail transports.

mod console;
mod smtp;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;

use crate::config::{MailSettings, MailTransport};
use mochila_core::error::Result;
use mochila_core::mail::VerificationMailer;
use std::sync::Arc;

/// Builds the mailer selected by the settings.
pub fn build_mailer(settings: &MailSettings) -> Result<Arc<dyn VerificationMailer>> {
    match settings.transport() {
        MailTransport::Console => {
            tracing::warn!("No mail transport configured, verification codes will be logged");
            Ok(Arc::new(ConsoleMailer::new()))
        }
        MailTransport::Smtp(smtp) => Ok(Arc::new(SmtpMailer::new(&smtp, &settings.sender())?)),
    }
}
