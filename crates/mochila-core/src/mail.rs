//! Verification mail content and the transport port.

use async_trait::async_trait;

use crate::error::Result;

pub const DEFAULT_SUBJECT: &str = "mochilaアプリからの確認コード";

/// A rendered verification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub to: String,
    pub code: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl VerificationEmail {
    pub fn new(to: impl Into<String>, code: impl Into<String>, subject: Option<String>) -> Self {
        let code = code.into();
        Self {
            to: to.into(),
            subject: subject
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            text: render_text(&code),
            html: render_html(&code),
            code,
        }
    }
}

fn render_text(code: &str) -> String {
    format!(
        "認証コード\n\nあなたの認証コードは以下の通りです：\n\n{code}\n\n\
         このコードは10分間有効です。\nこのメールに心当たりがない場合は、無視してください。\n"
    )
}

fn render_html(code: &str) -> String {
    format!(
        r#"<div style="font-family: 'Noto Sans JP', sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #6758E8; text-align: center;">認証コード</h2>
  <p style="font-size: 16px; color: #4A4A4A; line-height: 1.6;">
    こんにちは、<br/><br/>
    あなたの認証コードは以下の通りです：
  </p>
  <div style="background-color: #e9f2f2; border-radius: 8px; padding: 20px; text-align: center; margin: 30px 0;">
    <h1 style="color: #6758E8; font-size: 32px; letter-spacing: 8px; margin: 0;">{code}</h1>
  </div>
  <p style="font-size: 14px; color: #999; line-height: 1.6;">
    このコードは10分間有効です。<br/>
    このメールに心当たりがない場合は、無視してください。
  </p>
</div>"#
    )
}

/// Delivers verification messages.
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Sends the message and returns the transport's message id.
    async fn send(&self, email: &VerificationEmail) -> Result<String>;

    /// Transport name for logs (`console`, `smtp:smtp.sendgrid.net`, ...).
    fn describe(&self) -> String;
}
