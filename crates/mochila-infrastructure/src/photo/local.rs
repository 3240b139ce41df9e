//! Photos on the local filesystem, served back under `/uploads/`.

use async_trait::async_trait;
use mochila_core::error::{MochilaError, Result};
use mochila_core::photo::{PhotoFile, PhotoStorage};
use std::path::{Path, PathBuf};

use super::{dotted_extension, unique_suffix};

/// URL path prefix under which the upload directory is served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Writes photos into one flat directory.
///
/// References look like `/uploads/profile-photo-<millis>-<random>.png` and are
/// absolutized against the API base URL at read time.
#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    root: PathBuf,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a reference back to a file inside the upload directory.
    ///
    /// Returns `None` for references that are not ours (other hosts, path
    /// traversal, nested paths).
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let path = reference
            .split_once(UPLOADS_PREFIX)
            .map(|(_, rest)| rest)
            .unwrap_or(reference);
        let name = Path::new(path).file_name()?.to_str()?;
        if name != path || name.starts_with('.') {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn store(&self, photo: &PhotoFile) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!(
            "profile-photo-{}{}",
            unique_suffix(),
            dotted_extension(photo)
        );
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, &photo.bytes).await.map_err(|e| {
            MochilaError::io(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!(file = %file_name, bytes = photo.bytes.len(), "Stored photo locally");
        Ok(format!("{UPLOADS_PREFIX}{file_name}"))
    }

    async fn delete(&self, reference: &str) -> Result<()> {
        let Some(path) = self.resolve(reference) else {
            tracing::debug!(reference, "Not a local photo reference, skipping delete");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        format!("local:{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn png() -> PhotoFile {
        PhotoFile {
            bytes: vec![0x89, b'P', b'N', b'G'],
            file_name: "me.png".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_then_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalPhotoStorage::new(temp_dir.path().join("uploads"));

        let reference = storage.store(&png()).await.unwrap();
        assert!(reference.starts_with("/uploads/profile-photo-"));
        assert!(reference.ends_with(".png"));

        let path = storage.resolve(&reference).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), png().bytes);

        storage.delete(&reference).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalPhotoStorage::new(temp_dir.path());
        storage.delete("/uploads/never-existed.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_failure_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let storage = LocalPhotoStorage::new(blocker.join("uploads"));

        let err = storage.store(&png()).await.unwrap_err();
        assert!(matches!(err, MochilaError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn test_resolve_rejects_foreign_references() {
        let storage = LocalPhotoStorage::new("uploads");
        assert!(storage.resolve("/uploads/../secret").is_none());
        assert!(storage.resolve("/uploads/a/b.png").is_none());
        assert_eq!(
            storage.resolve("https://api.example.com/uploads/x.png"),
            Some(PathBuf::from("uploads/x.png"))
        );
    }
}
