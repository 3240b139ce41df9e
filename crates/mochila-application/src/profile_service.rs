//! Profile submission, lookup and photo upload.

use mochila_core::error::{MochilaError, Result};
use mochila_core::photo::{PhotoFile, PhotoStorage};
use mochila_core::user::{ProfileUpdate, UserRecord, UserRepository};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_PHOTO_FILTER: &str = "original";

/// Body of a profile submission: the identifying email plus any profile fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

/// A photo upload request.
#[derive(Debug, Clone, Default)]
pub struct PhotoUpload {
    pub email: Option<String>,
    pub filter: Option<String>,
    /// Append to the gallery instead of replacing the profile photo.
    pub is_additional: bool,
    pub photo: Option<PhotoFile>,
}

#[derive(Debug, Clone)]
pub struct PhotoUploadOutcome {
    /// Reference returned by the photo store (not absolutized).
    pub photo_ref: String,
    pub user: UserRecord,
}

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    photos: Arc<dyn PhotoStorage>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, photos: Arc<dyn PhotoStorage>) -> Self {
        Self { users, photos }
    }

    /// Creates or merges the profile keyed by email.
    ///
    /// `profilePhotoUrl` and `photos` are ignored here; only
    /// [`ProfileService::upload_photo`] writes them, which keeps `photos[0]`
    /// in step with the profile photo.
    pub async fn submit_profile(&self, submission: ProfileSubmission) -> Result<UserRecord> {
        let email = required_email(submission.email.as_deref())?;

        let mut profile = submission.profile;
        let photo_url = profile.profile_photo_url.take();
        let photos = profile.photos.take();
        if photo_url.is_some() || photos.is_some() {
            tracing::debug!(email = %email, "Ignoring photo fields in profile submission");
        }

        let user = self.users.upsert(email, profile).await?;
        tracing::info!(user_id = %user.id, email = %user.email, "Profile saved");
        Ok(user)
    }

    pub async fn get_profile(&self, email: &str) -> Result<UserRecord> {
        self.users
            .get_by_email(email)
            .await?
            .ok_or_else(|| MochilaError::not_found("User", email))
    }

    /// Stores the photo and attaches it to the user's profile.
    ///
    /// Everything is validated before the file is written, and the stored
    /// object is removed again if the profile update fails, so a failed
    /// request leaves no orphaned object behind.
    pub async fn upload_photo(&self, upload: PhotoUpload) -> Result<PhotoUploadOutcome> {
        let email = required_email(upload.email.as_deref())?;
        let photo = upload
            .photo
            .as_ref()
            .ok_or_else(|| MochilaError::validation("Photo file is required"))?;
        photo.validate()?;

        let user = self.get_profile(email).await?;

        let photo_ref = self.photos.store(photo).await?;
        tracing::info!(
            email = %email,
            storage = %self.photos.describe(),
            additional = upload.is_additional,
            "Photo stored"
        );

        let previous = user.profile_photo_url.clone().filter(|p| !p.is_empty());
        let mut photos = user.photos.clone();
        let update = if upload.is_additional {
            let profile_photo = previous.is_none().then(|| photo_ref.clone());
            if profile_photo.is_some() {
                photos.insert(0, photo_ref.clone());
            } else {
                photos.push(photo_ref.clone());
            }
            let filter = profile_photo.as_ref().map(|_| filter_or_default(upload.filter));
            ProfileUpdate::photos(profile_photo, photos, filter)
        } else {
            match photos.first_mut() {
                Some(first) => *first = photo_ref.clone(),
                None => photos.push(photo_ref.clone()),
            }
            ProfileUpdate::photos(
                Some(photo_ref.clone()),
                photos,
                Some(filter_or_default(upload.filter)),
            )
        };

        let user = match self.users.upsert(email, update).await {
            Ok(user) => user,
            Err(e) => {
                self.discard_photo(&photo_ref).await;
                return Err(e);
            }
        };

        if !upload.is_additional {
            if let Some(old) = previous.filter(|old| !user.photos.contains(old)) {
                self.discard_photo(&old).await;
            }
        }

        Ok(PhotoUploadOutcome { photo_ref, user })
    }

    async fn discard_photo(&self, reference: &str) {
        if let Err(e) = self.photos.delete(reference).await {
            tracing::warn!(reference, error = %e, "Failed to delete photo");
        }
    }
}

fn required_email(email: Option<&str>) -> Result<&str> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| MochilaError::validation("Email is required"))
}

fn filter_or_default(filter: Option<String>) -> String {
    filter
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PHOTO_FILTER.to_string())
}
