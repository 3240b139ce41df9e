//! In-memory adapter for the user and interaction repositories.

use async_trait::async_trait;
use chrono::Utc;
use mochila_core::dataset::Dataset;
use mochila_core::error::Result;
use mochila_core::interaction::{FootprintRecord, InteractionRepository, LikeRecord};
use mochila_core::user::{ProfileUpdate, UserRecord, UserRepository};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keeps the whole dataset behind one async mutex.
///
/// Each mutation (event insert plus counter bump) runs inside a single lock
/// acquisition, so concurrent likes on the same member never lose an update.
/// Cloning shares the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Dataset>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            data: Arc::new(Mutex::new(dataset)),
        }
    }

    /// Copy of the current state, for inspection in tests and diagnostics.
    pub async fn snapshot(&self) -> Dataset {
        self.data.lock().await.clone()
    }

    /// Inserts sample records whose email is not present yet.
    pub async fn seed(&self, records: Vec<UserRecord>) -> usize {
        self.data.lock().await.seed(records)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_all(&self) -> Result<Vec<UserRecord>> {
        Ok(self.data.lock().await.users.clone())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.data.lock().await.user_by_email(email).cloned())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        Ok(self.data.lock().await.user_by_id(id).cloned())
    }

    async fn upsert(&self, email: &str, update: ProfileUpdate) -> Result<UserRecord> {
        let mut data = self.data.lock().await;
        Ok(data.upsert_user(email, update, Utc::now()))
    }
}

#[async_trait]
impl InteractionRepository for MemoryStore {
    async fn add_like(&self, from_user_id: &str, to_user_id: &str) -> Result<LikeRecord> {
        let mut data = self.data.lock().await;
        let outcome = data.record_like(from_user_id, to_user_id, Utc::now());
        if !outcome.created {
            tracing::debug!(from = from_user_id, to = to_user_id, "Like already recorded");
        }
        Ok(outcome.like)
    }

    async fn add_footprint(&self, viewer_id: &str, viewed_id: &str) -> Result<FootprintRecord> {
        let mut data = self.data.lock().await;
        Ok(data.record_footprint(viewer_id, viewed_id, Utc::now()))
    }

    async fn likes_to(&self, user_id: &str) -> Result<Vec<LikeRecord>> {
        Ok(self.data.lock().await.likes_to(user_id))
    }

    async fn footprints_of(&self, user_id: &str) -> Result<Vec<FootprintRecord>> {
        Ok(self.data.lock().await.footprints_of(user_id))
    }
}
