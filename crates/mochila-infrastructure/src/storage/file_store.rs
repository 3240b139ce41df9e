//! JSON-file adapter for the user and interaction repositories.

use async_trait::async_trait;
use chrono::Utc;
use mochila_core::dataset::Dataset;
use mochila_core::error::{MochilaError, Result};
use mochila_core::interaction::{FootprintRecord, InteractionRepository, LikeRecord};
use mochila_core::user::{ProfileUpdate, UserRecord, UserRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::atomic_json::{AtomicJsonError, AtomicJsonFile};

/// Persists the dataset as one JSON document.
///
/// Every operation is load → mutate → save under the file lock, on the
/// blocking pool. A failed save leaves the previous document in place, so
/// a like or footprint is either fully written with its counter or not at all.
///
/// File layout:
/// ```text
/// data_dir/
/// ├── mochila.json
/// └── mochila.lock
/// ```
#[derive(Clone)]
pub struct FileStore {
    file: Arc<AtomicJsonFile<Dataset>>,
    /// Serializes access within this process before the OS lock is taken.
    guard: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path.into())),
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Inserts sample records whose email is not present yet.
    pub async fn seed(&self, records: Vec<UserRecord>) -> Result<usize> {
        self.mutate(move |data| data.seed(records)).await
    }

    async fn mutate<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Dataset) -> R + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.guard.lock().await;
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.update(Dataset::default(), f))
            .await
            .map_err(|e| MochilaError::internal(format!("Failed to join task: {}", e)))?
            .map_err(storage_error)
    }

    async fn read<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Dataset) -> R + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.guard.lock().await;
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.read(Dataset::default(), f))
            .await
            .map_err(|e| MochilaError::internal(format!("Failed to join task: {}", e)))?
            .map_err(storage_error)
    }
}

fn storage_error(err: AtomicJsonError) -> MochilaError {
    tracing::error!(error = %err, "Data file access failed");
    MochilaError::storage(err.to_string())
}

#[async_trait]
impl UserRepository for FileStore {
    async fn get_all(&self) -> Result<Vec<UserRecord>> {
        self.read(|data| data.users.clone()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = email.to_string();
        self.read(move |data| data.user_by_email(&email).cloned()).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let id = id.to_string();
        self.read(move |data| data.user_by_id(&id).cloned()).await
    }

    async fn upsert(&self, email: &str, update: ProfileUpdate) -> Result<UserRecord> {
        let email = email.to_string();
        self.mutate(move |data| data.upsert_user(&email, update, Utc::now()))
            .await
    }
}

#[async_trait]
impl InteractionRepository for FileStore {
    async fn add_like(&self, from_user_id: &str, to_user_id: &str) -> Result<LikeRecord> {
        let (from, to) = (from_user_id.to_string(), to_user_id.to_string());
        let outcome = self
            .mutate(move |data| data.record_like(&from, &to, Utc::now()))
            .await?;
        Ok(outcome.like)
    }

    async fn add_footprint(&self, viewer_id: &str, viewed_id: &str) -> Result<FootprintRecord> {
        let (viewer, viewed) = (viewer_id.to_string(), viewed_id.to_string());
        self.mutate(move |data| data.record_footprint(&viewer, &viewed, Utc::now()))
            .await
    }

    async fn likes_to(&self, user_id: &str) -> Result<Vec<LikeRecord>> {
        let user_id = user_id.to_string();
        self.read(move |data| data.likes_to(&user_id)).await
    }

    async fn footprints_of(&self, user_id: &str) -> Result<Vec<FootprintRecord>> {
        let user_id = user_id.to_string();
        self.read(move |data| data.footprints_of(&user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("mochila.json"));
        (store, temp_dir)
    }

    fn named(name: &str) -> ProfileUpdate {
        ProfileUpdate {
            display_name: Some(name.to_string()),
            ..ProfileUpdate::default()
        }
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let (store, temp_dir) = create_test_store();
        let user = store.upsert("a@example.com", named("a")).await.unwrap();
        store.add_footprint("viewer", &user.id).await.unwrap();

        let reopened = FileStore::new(temp_dir.path().join("mochila.json"));
        let loaded = reopened.get_by_id(&user.id).await.unwrap().unwrap();

        assert_eq!(loaded.display_name.as_deref(), Some("a"));
        assert_eq!(loaded.views_count, 1);
        assert_eq!(reopened.footprints_of(&user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeat_like_is_noop() {
        let (store, _temp_dir) = create_test_store();
        let a = store.upsert("a@example.com", named("a")).await.unwrap();
        let b = store.upsert("b@example.com", named("b")).await.unwrap();

        let first = store.add_like(&a.id, &b.id).await.unwrap();
        let second = store.add_like(&a.id, &b.id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.get_by_id(&b.id).await.unwrap().unwrap().likes_count, 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_storage_unavailable() {
        let (store, _temp_dir) = create_test_store();
        std::fs::write(store.path(), "not json").unwrap();

        let err = store.get_all().await.unwrap_err();
        assert!(err.is_storage_unavailable());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_footprints_all_land() {
        let (store, _temp_dir) = create_test_store();
        let target = store.upsert("t@example.com", named("t")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            let id = target.id.clone();
            handles.push(tokio::spawn(async move {
                store.add_footprint("viewer", &id).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let target = store.get_by_id(&target.id).await.unwrap().unwrap();
        assert_eq!(target.views_count, 10);
    }
}
