use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use mochila_core::interaction::InteractionRepository;
use mochila_core::photo::PhotoStorage;
use mochila_core::user::UserRepository;
use mochila_infrastructure::config::PhotoSettings;
use mochila_infrastructure::seed::sample_members;
use mochila_infrastructure::{
    AppConfig, FileStore, LocalPhotoStorage, MemoryStore, S3PhotoStorage, StoreBackend,
    build_mailer,
};

use super::AppState;

type Stores = (Arc<dyn UserRepository>, Arc<dyn InteractionRepository>);

/// Builds every adapter named by `config` and wires the application state.
pub async fn bootstrap(config: &AppConfig) -> Result<AppState> {
    let (users, interactions) = open_store(config).await?;
    let photos = open_photo_storage(&config.photos)?;
    let mailer = build_mailer(&config.mail).context("Failed to configure mail transport")?;

    tracing::info!(
        "[Bootstrap] photos={} mail={} base_url={}",
        photos.describe(),
        mailer.describe(),
        config.server.api_base_url
    );

    Ok(AppState::new(
        users,
        interactions,
        photos,
        mailer,
        &config.server,
        config.photos.upload_dir.clone(),
    ))
}

async fn open_store(config: &AppConfig) -> Result<Stores> {
    let seed = config.store.seed_sample_data;

    match config.store.backend {
        StoreBackend::Memory => {
            let store = MemoryStore::new();
            if seed {
                let added = store.seed(sample_members(Utc::now())).await;
                tracing::info!("[Bootstrap] Seeded {} sample members", added);
            }
            tracing::info!("[Bootstrap] Using in-memory store");
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
        StoreBackend::File => {
            let store = FileStore::new(config.store.data_file.clone());
            if seed {
                let users = store.get_all().await.context("Failed to read data file")?;
                if users.is_empty() {
                    let added = store
                        .seed(sample_members(Utc::now()))
                        .await
                        .context("Failed to seed data file")?;
                    tracing::info!("[Bootstrap] Seeded {} sample members", added);
                }
            }
            tracing::info!("[Bootstrap] Using data file: {}", store.path().display());
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
    }
}

fn open_photo_storage(settings: &PhotoSettings) -> Result<Arc<dyn PhotoStorage>> {
    if settings.s3_enabled() {
        let storage =
            S3PhotoStorage::from_settings(&settings.s3).context("Failed to configure S3")?;
        return Ok(Arc::new(storage));
    }
    Ok(Arc::new(LocalPhotoStorage::new(settings.upload_dir.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mochila_core::member::SortMode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_seeded_once() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::File;
        config.store.data_file = temp_dir.path().join("data.json");
        config.photos.upload_dir = temp_dir.path().join("uploads");

        bootstrap(&config).await.unwrap();
        let state = bootstrap(&config).await.unwrap();

        let members = state
            .member_service
            .list_members(SortMode::New, None)
            .await
            .unwrap();
        assert_eq!(members.len(), 5);
    }

    #[tokio::test]
    async fn test_memory_store_without_seed_is_empty() {
        let mut config = AppConfig::default();
        config.store.seed_sample_data = false;

        let state = bootstrap(&config).await.unwrap();
        let members = state
            .member_service
            .list_members(SortMode::Popular, None)
            .await
            .unwrap();
        assert!(members.is_empty());
    }
}
