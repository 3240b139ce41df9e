//! HTTP handlers, one module per resource.

pub mod email;
pub mod health;
pub mod members;
pub mod user;

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejection renders as the failure envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

pub type ApiResult = Result<axum::Json<serde_json::Value>, ApiError>;
