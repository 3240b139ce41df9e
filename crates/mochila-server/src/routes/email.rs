use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use super::{ApiJson, ApiResult};
use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    email: Option<String>,
    code: Option<String>,
    subject: Option<String>,
}

/// `POST /api/send-verification-email`
pub async fn send_verification_email(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerificationRequest>,
) -> ApiResult {
    let message_id = state
        .verification_service
        .send_code(body.email.as_deref(), body.code.as_deref(), body.subject)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Verification email sent successfully",
        "messageId": message_id,
    })))
}
