//! Photos in an S3 bucket with public-read ACL.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use mochila_core::error::{MochilaError, Result};
use mochila_core::photo::{PhotoFile, PhotoStorage};

use super::{dotted_extension, unique_suffix};
use crate::config::S3Settings;

const KEY_PREFIX: &str = "profile-photos/";

/// Stores photos as `profile-photos/<stem>-<millis>-<random><ext>`.
///
/// References are full public URLs, so they pass through
/// `PhotoUrlResolver` untouched.
#[derive(Clone)]
pub struct S3PhotoStorage {
    client: Client,
    bucket: String,
    region: String,
}

impl S3PhotoStorage {
    /// Builds a client from static credentials. Fails if any are missing.
    pub fn from_settings(settings: &S3Settings) -> Result<Self> {
        let (Some(key_id), Some(secret)) = (
            settings.access_key_id.as_deref(),
            settings.secret_access_key.as_deref(),
        ) else {
            return Err(MochilaError::config("S3 credentials are not configured"));
        };

        let credentials = Credentials::new(key_id, secret, None, None, "mochila-config");
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .build();

        Ok(Self {
            client: Client::from_conf(config),
            bucket: settings.bucket.clone(),
            region: settings.region.clone(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }

    fn object_key(photo: &PhotoFile) -> String {
        let stem = std::path::Path::new(&photo.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().replace(char::is_whitespace, "_"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "photo".to_string());
        format!(
            "{KEY_PREFIX}{stem}-{}{}",
            unique_suffix(),
            dotted_extension(photo)
        )
    }
}

/// Object key of a URL produced by [`S3PhotoStorage::public_url`].
fn key_from_url(reference: &str) -> Option<&str> {
    reference
        .split_once(".amazonaws.com/")
        .map(|(_, key)| key)
        .filter(|key| !key.is_empty())
}

#[async_trait]
impl PhotoStorage for S3PhotoStorage {
    async fn store(&self, photo: &PhotoFile) -> Result<String> {
        let key = Self::object_key(photo);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(photo.bytes.clone()))
            .content_type(&photo.mime_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %DisplayErrorContext(&e), key = %key, "S3 upload failed");
                MochilaError::storage(format!(
                    "Failed to upload {} to S3: {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, "Stored photo in S3");
        Ok(self.public_url(&key))
    }

    async fn delete(&self, reference: &str) -> Result<()> {
        let Some(key) = key_from_url(reference) else {
            tracing::debug!(reference, "Not an S3 photo reference, skipping delete");
            return Ok(());
        };

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                MochilaError::storage(format!(
                    "Failed to delete S3 object {}: {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("s3:{}", self.bucket)
    }
}
