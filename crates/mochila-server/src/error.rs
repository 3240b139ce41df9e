//! Failure responses.
//!
//! Every failure renders as `{ "success": false, "error": "..." }`. The
//! internal error text travels in a response extension and is only copied
//! into a `details` field by [`attach_error_details`] when the server runs
//! with `expose_error_details` on.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use mochila_core::error::MochilaError;
use serde_json::json;

use crate::app::AppState;

#[derive(Debug)]
pub struct ApiError(pub MochilaError);

/// Message and internal detail of a failed request.
#[derive(Debug, Clone)]
struct ErrorEnvelope {
    message: String,
    details: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(MochilaError::validation(message))
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            MochilaError::Validation(_) | MochilaError::Upload(_) => StatusCode::BAD_REQUEST,
            MochilaError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message safe to show in any configuration.
    fn public_message(&self) -> String {
        match &self.0 {
            MochilaError::Validation(message) | MochilaError::Upload(message) => message.clone(),
            MochilaError::NotFound { entity_type, .. } => format!("{entity_type} not found"),
            MochilaError::Mail(_) => "Failed to send email".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<MochilaError> for ApiError {
    fn from(err: MochilaError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Request rejected");
        }

        let mut response = (
            status,
            Json(json!({ "success": false, "error": message })),
        )
            .into_response();
        response.extensions_mut().insert(ErrorEnvelope {
            message,
            details: self.0.to_string(),
        });
        response
    }
}

/// Re-renders failure bodies with a `details` field when detail exposure is on.
pub async fn attach_error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.expose_error_details {
        return response;
    }

    let Some(envelope) = response.extensions().get::<ErrorEnvelope>().cloned() else {
        return response;
    };
    (
        response.status(),
        Json(json!({
            "success": false,
            "error": envelope.message,
            "details": envelope.details,
        })),
    )
        .into_response()
}
