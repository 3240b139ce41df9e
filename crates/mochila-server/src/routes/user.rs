use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use mochila_application::{PhotoUpload, ProfileSubmission};
use mochila_core::error::MochilaError;
use mochila_core::member::PhotoUrlResolver;
use mochila_core::photo::PhotoFile;
use mochila_core::user::UserRecord;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiJson, ApiResult};
use crate::app::AppState;
use crate::error::ApiError;

/// JSON variant of the photo upload, for clients that cannot send multipart.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base64PhotoRequest {
    email: Option<String>,
    filter: Option<String>,
    /// `true` or `"true"`.
    is_additional: Option<Value>,
    photo_base64: Option<String>,
    file_name: Option<String>,
    mime_type: Option<String>,
}

/// `POST /api/user/profile`
pub async fn submit_profile(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<ProfileSubmission>,
) -> ApiResult {
    let user = state.profile_service.submit_profile(submission).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile saved successfully",
        "user": {
            "id": user.id,
            "email": user.email,
            "displayName": user.display_name,
        },
    })))
}

/// `GET /api/user/profile/{email}`
pub async fn get_profile(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult {
    let user = state.profile_service.get_profile(&email).await?;
    Ok(Json(json!({
        "success": true,
        "user": with_absolute_photos(user, &state.resolver),
    })))
}

/// `POST /api/user/profile/photo`, multipart (`photo` file part) or JSON (`photoBase64`).
pub async fn upload_photo(State(state): State<AppState>, request: Request) -> ApiResult {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let upload = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let ApiJson(body) = ApiJson::<Base64PhotoRequest>::from_request(request, &state).await?;
        decode_base64_upload(body)?
    };

    let outcome = state.profile_service.upload_photo(upload).await?;
    let user = with_absolute_photos(outcome.user, &state.resolver);

    Ok(Json(json!({
        "success": true,
        "message": "Photo uploaded successfully",
        "photoUrl": state.resolver.absolutize(&outcome.photo_ref),
        "user": {
            "id": user.id,
            "email": user.email,
            "displayName": user.display_name,
            "profilePhotoUrl": user.profile_photo_url,
            "photos": user.photos,
        },
    })))
}

async fn read_multipart(mut multipart: Multipart) -> Result<PhotoUpload, ApiError> {
    let mut upload = PhotoUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&file_name)
                            .first_or_octet_stream()
                            .to_string()
                    });
                let bytes = field.bytes().await.map_err(upload_error)?;
                upload.photo = Some(PhotoFile {
                    bytes: bytes.to_vec(),
                    file_name,
                    mime_type,
                });
            }
            "email" => upload.email = Some(field.text().await.map_err(upload_error)?),
            "filter" => upload.filter = Some(field.text().await.map_err(upload_error)?),
            "isAdditional" => {
                let text = field.text().await.map_err(upload_error)?;
                upload.is_additional = text.trim().eq_ignore_ascii_case("true");
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(upload)
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError(MochilaError::upload(err.body_text()))
}

fn decode_base64_upload(body: Base64PhotoRequest) -> Result<PhotoUpload, ApiError> {
    let is_additional = match &body.is_additional {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };

    let photo = body
        .photo_base64
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| decode_photo(raw, body.file_name.clone(), body.mime_type.clone()))
        .transpose()?;

    Ok(PhotoUpload {
        email: body.email,
        filter: body.filter,
        is_additional,
        photo,
    })
}

/// Accepts bare base64 or a `data:<mime>;base64,<data>` URL.
fn decode_photo(
    raw: &str,
    file_name: Option<String>,
    mime_type: Option<String>,
) -> Result<PhotoFile, ApiError> {
    let (prefix_mime, data) = match raw
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((mime, data)) => (Some(mime.to_string()), data),
        None => (None, raw),
    };

    let mime_type = mime_type
        .or(prefix_mime)
        .unwrap_or_else(|| "image/jpeg".to_string());
    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| ApiError::validation(format!("Invalid photoBase64: {e}")))?;
    let file_name = file_name.unwrap_or_else(|| {
        let ext = mime_type.strip_prefix("image/").unwrap_or("jpg");
        format!("photo.{ext}")
    });

    Ok(PhotoFile {
        bytes,
        file_name,
        mime_type,
    })
}

fn with_absolute_photos(mut user: UserRecord, resolver: &PhotoUrlResolver) -> UserRecord {
    user.profile_photo_url = user
        .profile_photo_url
        .filter(|p| !p.is_empty())
        .map(|p| resolver.absolutize(&p));
    user.photos = user.photos.iter().map(|p| resolver.absolutize(p)).collect();
    user
}
