//! Photo storage port and upload rules.

use async_trait::async_trait;

use crate::error::{MochilaError, Result};

/// Largest accepted photo, in bytes.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

/// Raw photo as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl PhotoFile {
    /// Extension of the original file name, lowercased, without the dot.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Accepts jpeg/png/gif by both extension and MIME type, up to [`MAX_PHOTO_BYTES`].
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(MochilaError::validation("Photo file is required"));
        }
        if self.bytes.len() > MAX_PHOTO_BYTES {
            return Err(MochilaError::upload("Photo exceeds the 10MB limit"));
        }

        let extension_ok = self
            .extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
        let mime = self.mime_type.to_ascii_lowercase();
        let mime_ok = mime
            .strip_prefix("image/")
            .is_some_and(|sub| ALLOWED_EXTENSIONS.contains(&sub));

        if extension_ok && mime_ok {
            Ok(())
        } else {
            Err(MochilaError::upload("Only image files are allowed!"))
        }
    }
}

/// Where uploaded photos live. References returned by `store` are opaque to
/// the rest of the system and end up in `UserRecord::photos`.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Persists the bytes and returns a stable reference (URL or store-relative path).
    async fn store(&self, photo: &PhotoFile) -> Result<String>;

    /// Removes the object behind `reference`. Missing objects are not an error.
    async fn delete(&self, reference: &str) -> Result<()>;

    /// Short label for logs, e.g. `local:uploads` or `s3:bucket`.
    fn describe(&self) -> String;
}
