use chrono::Utc;
use mochila_core::interaction::InteractionRepository;
use mochila_core::user::{ProfileUpdate, UserRepository};
use mochila_infrastructure::seed::sample_members;
use mochila_infrastructure::{FileStore, MemoryStore};
use tempfile::TempDir;

/// Any type that serves both repository ports.
trait Store: UserRepository + InteractionRepository {}
impl<T: UserRepository + InteractionRepository> Store for T {}

fn profile(name: &str, interests: &[&str]) -> ProfileUpdate {
    ProfileUpdate {
        display_name: Some(name.to_string()),
        interests: Some(interests.iter().map(|s| s.to_string()).collect()),
        ..ProfileUpdate::default()
    }
}

async fn upsert_merges_fields(store: &dyn Store) {
    let created = store
        .upsert("x@example.com", profile("X", &["旅行"]))
        .await
        .expect("Should create user");
    assert_eq!(created.likes_count, 0);
    assert_eq!(created.views_count, 0);

    let update = ProfileUpdate {
        region: Some("大阪".to_string()),
        ..ProfileUpdate::default()
    };
    let merged = store
        .upsert("x@example.com", update)
        .await
        .expect("Should merge user");

    assert_eq!(merged.id, created.id, "Upsert must keep the id");
    assert_eq!(merged.display_name.as_deref(), Some("X"));
    assert_eq!(merged.region.as_deref(), Some("大阪"));
    assert_eq!(merged.interests, vec!["旅行".to_string()]);
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}

async fn likes_are_idempotent(store: &dyn Store) {
    let a = store.upsert("a@example.com", profile("A", &[])).await.unwrap();
    let b = store.upsert("b@example.com", profile("B", &[])).await.unwrap();

    store.add_like(&a.id, &b.id).await.unwrap();
    store.add_like(&a.id, &b.id).await.unwrap();
    store.add_like(&b.id, &a.id).await.unwrap();

    let b = store.get_by_id(&b.id).await.unwrap().unwrap();
    assert_eq!(b.likes_count, 1);
    assert_eq!(store.likes_to(&b.id).await.unwrap().len(), 1);
    assert_eq!(store.likes_to(&a.id).await.unwrap().len(), 1);
}

async fn footprints_accumulate(store: &dyn Store) {
    let viewed = store.upsert("v@example.com", profile("V", &[])).await.unwrap();

    store.add_footprint("anonymous", &viewed.id).await.unwrap();
    store.add_footprint("anonymous", &viewed.id).await.unwrap();

    let viewed = store.get_by_id(&viewed.id).await.unwrap().unwrap();
    assert_eq!(viewed.views_count, 2, "Repeat views each count");
    assert_eq!(store.footprints_of(&viewed.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_memory_store_contract() {
    upsert_merges_fields(&MemoryStore::new()).await;
    likes_are_idempotent(&MemoryStore::new()).await;
    footprints_accumulate(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_file_store_contract() {
    let temp_dir = TempDir::new().unwrap();
    let path = |name: &str| temp_dir.path().join(name);

    upsert_merges_fields(&FileStore::new(path("upsert.json"))).await;
    likes_are_idempotent(&FileStore::new(path("likes.json"))).await;
    footprints_accumulate(&FileStore::new(path("footprints.json"))).await;
}

#[tokio::test]
async fn test_seed_only_fills_missing_members() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path().join("seeded.json"));

    let added = store.seed(sample_members(Utc::now())).await.unwrap();
    assert_eq!(added, 5);

    let again = store.seed(sample_members(Utc::now())).await.unwrap();
    assert_eq!(again, 0, "Seeding twice must not duplicate members");

    let first = store.get_by_id("1").await.unwrap().unwrap();
    assert_eq!(first.email, "user1@example.com");
}
