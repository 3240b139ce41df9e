use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use mochila_application::{
    InteractionLedger, MemberQueryService, PhotoUpload, ProfileService, ProfileSubmission,
    VerificationService,
};
use mochila_core::error::{MochilaError, Result};
use mochila_core::interaction::InteractionRepository;
use mochila_core::mail::{VerificationEmail, VerificationMailer};
use mochila_core::member::{PhotoUrlResolver, SortMode};
use mochila_core::photo::{PhotoFile, PhotoStorage};
use mochila_core::user::{ProfileUpdate, UserRecord, UserRepository};
use mochila_infrastructure::{LocalPhotoStorage, MemoryStore};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const BASE_URL: &str = "https://api.example.com";

struct Fixture {
    store: MemoryStore,
    ledger: Arc<InteractionLedger>,
    members: MemberQueryService,
    profiles: ProfileService,
    uploads: TempDir,
}

fn fixture(store: MemoryStore) -> Fixture {
    let uploads = TempDir::new().unwrap();
    let users: Arc<dyn UserRepository> = Arc::new(store.clone());
    let interactions: Arc<dyn InteractionRepository> = Arc::new(store.clone());
    let resolver = PhotoUrlResolver::new(BASE_URL);

    let ledger = Arc::new(InteractionLedger::new(
        users.clone(),
        interactions,
        resolver.clone(),
    ));
    let members = MemberQueryService::new(users.clone(), ledger.clone(), resolver);
    let profiles = ProfileService::new(users, Arc::new(LocalPhotoStorage::new(uploads.path())));

    Fixture {
        store,
        ledger,
        members,
        profiles,
        uploads,
    }
}

fn member(id: &str, name: Option<&str>, match_rate: i64, likes: u64) -> UserRecord {
    let mut record = UserRecord::new(id, format!("{id}@example.com"), Utc::now());
    record.display_name = name.map(str::to_string);
    record.match_rate = match_rate;
    record.likes_count = likes;
    record
}

async fn seeded(records: Vec<UserRecord>) -> Fixture {
    let store = MemoryStore::new();
    store.seed(records).await;
    fixture(store)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn png(name: &str) -> PhotoFile {
    PhotoFile {
        bytes: vec![0x89, b'P', b'N', b'G'],
        file_name: name.to_string(),
        mime_type: "image/png".to_string(),
    }
}

fn submission(email: &str, name: &str) -> ProfileSubmission {
    ProfileSubmission {
        email: Some(email.to_string()),
        profile: ProfileUpdate {
            display_name: Some(name.to_string()),
            ..ProfileUpdate::default()
        },
    }
}

#[tokio::test]
async fn test_popular_orders_by_score() {
    let f = seeded(vec![member("a", Some("A"), 60, 2), member("b", Some("B"), 50, 5)]).await;

    let listed = f
        .members
        .list_members_on(SortMode::Popular, None, today())
        .await
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"], "50+50 beats 60+20");
}

#[tokio::test]
async fn test_new_orders_by_creation() {
    let now = Utc::now();
    let mut older = member("old", Some("Old"), 0, 0);
    older.created_at = now - Duration::hours(1);
    let mut newer = member("new", Some("New"), 0, 0);
    newer.created_at = now;
    let f = seeded(vec![older, newer]).await;

    let listed = f.members.list_members(SortMode::New, None).await.unwrap();
    assert_eq!(listed[0].id, "new");
}

#[tokio::test]
async fn test_list_skips_unnamed_and_excluded() {
    let f = seeded(vec![
        member("a", Some("A"), 10, 0),
        member("b", None, 99, 99),
        member("c", Some(""), 99, 99),
        member("d", Some("D"), 5, 0),
    ])
    .await;

    for mode in [SortMode::Popular, SortMode::Login, SortMode::Recommended, SortMode::New] {
        let listed = f
            .members
            .list_members(mode, Some("d@example.com"))
            .await
            .unwrap();
        let ids: Vec<_> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a"], "mode {mode}");
    }
}

#[tokio::test]
async fn test_list_derives_age_and_placeholder_region() {
    let mut record = member("a", Some("A"), 0, 0);
    record.birthday = Some("2000-06-15".to_string());
    record.profile_photo_url = Some("/uploads/x.png".to_string());
    let f = seeded(vec![record]).await;

    let listed = f
        .members
        .list_members_on(SortMode::Popular, None, today())
        .await
        .unwrap();
    assert_eq!(listed[0].age, Some(23));
    assert_eq!(listed[0].region, "未設定");
    assert_eq!(
        listed[0].profile_photo_url.as_deref(),
        Some("https://api.example.com/uploads/x.png")
    );

    // Absolutization is presentation only.
    let stored = f.store.get_by_id("a").await.unwrap().unwrap();
    assert_eq!(stored.profile_photo_url.as_deref(), Some("/uploads/x.png"));
}

#[tokio::test]
async fn test_detail_records_footprint() {
    let f = seeded(vec![member("a", Some("A"), 0, 0), member("v", Some("V"), 0, 0)]).await;

    let first = f.members.get_member_detail("a", Some("v")).await.unwrap();
    let second = f.members.get_member_detail("a", None).await.unwrap();

    assert_eq!(first.views_count, 1);
    assert_eq!(second.views_count, 2);

    let footprints = f.store.footprints_of("a").await.unwrap();
    assert_eq!(footprints.len(), 2);
    assert!(footprints.iter().any(|fp| fp.viewer_id == "anonymous"));

    // The anonymous view has no resolvable viewer and is dropped.
    let resolved = f.ledger.footprints("a").await.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].user.id, "v");
}

#[tokio::test]
async fn test_detail_unknown_member_writes_nothing() {
    let f = seeded(vec![member("a", Some("A"), 0, 0)]).await;

    let err = f.members.get_member_detail("missing", Some("a")).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(f.store.snapshot().await.footprints.is_empty());
}

#[tokio::test]
async fn test_likes_received_newest_first_and_dangling_dropped() {
    let f = seeded(vec![
        member("target", Some("T"), 0, 0),
        member("first", Some("F"), 0, 0),
        member("second", Some("S"), 0, 0),
    ])
    .await;

    f.ledger.add_like("first", "target").await.unwrap();
    f.ledger.add_like("ghost", "target").await.unwrap();
    f.ledger.add_like("second", "target").await.unwrap();
    f.ledger.add_like("second", "target").await.unwrap();

    let likes = f.ledger.likes_received("target").await.unwrap();
    let senders: Vec<_> = likes.iter().map(|l| l.user.id.as_str()).collect();
    assert_eq!(senders, vec!["second", "first"]);

    let target = f.store.get_by_id("target").await.unwrap().unwrap();
    assert_eq!(target.likes_count, 3, "ghost like still counts, repeat does not");
}

#[tokio::test]
async fn test_like_requires_both_ids() {
    let f = seeded(vec![]).await;
    let err = f.ledger.add_like("", "b").await.unwrap_err();
    assert!(err.is_validation());
    assert!(f.store.snapshot().await.likes.is_empty());
}

#[tokio::test]
async fn test_submit_profile_upserts_by_email() {
    let f = seeded(vec![]).await;

    let created = f.profiles.submit_profile(submission("x@example.com", "X")).await.unwrap();
    let updated = f.profiles.submit_profile(submission("x@example.com", "Y")).await.unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.display_name.as_deref(), Some("Y"));
    assert_eq!(f.store.get_all().await.unwrap().len(), 1);

    let missing = f
        .profiles
        .submit_profile(ProfileSubmission::default())
        .await
        .unwrap_err();
    assert!(missing.is_validation());
    assert_eq!(missing.to_string(), "Email is required");
}

#[tokio::test]
async fn test_get_profile_unknown_email() {
    let f = seeded(vec![]).await;
    let err = f.profiles.get_profile("nobody@example.com").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_photo_replace_and_append() {
    let f = seeded(vec![]).await;
    f.profiles.submit_profile(submission("p@example.com", "P")).await.unwrap();

    let upload = |name: &str, is_additional: bool| PhotoUpload {
        email: Some("p@example.com".to_string()),
        filter: None,
        is_additional,
        photo: Some(png(name)),
    };

    let first = f.profiles.upload_photo(upload("a.png", false)).await.unwrap();
    assert_eq!(first.user.profile_photo_url.as_deref(), Some(first.photo_ref.as_str()));
    assert_eq!(first.user.photos, vec![first.photo_ref.clone()]);
    assert_eq!(first.user.profile_photo_filter.as_deref(), Some("original"));

    let extra = f.profiles.upload_photo(upload("b.png", true)).await.unwrap();
    assert_eq!(extra.user.photos.len(), 2);
    assert_eq!(extra.user.profile_photo_url.as_deref(), Some(first.photo_ref.as_str()));

    let replaced = f.profiles.upload_photo(upload("c.png", false)).await.unwrap();
    assert_eq!(
        replaced.user.photos,
        vec![replaced.photo_ref.clone(), extra.photo_ref.clone()]
    );
    assert_eq!(
        replaced.user.profile_photo_url.as_deref(),
        Some(replaced.photo_ref.as_str())
    );

    let on_disk = |reference: &str| {
        let name = reference.trim_start_matches("/uploads/");
        f.uploads.path().join(name).exists()
    };
    assert!(!on_disk(&first.photo_ref), "replaced profile photo is deleted");
    assert!(on_disk(&extra.photo_ref));
    assert!(on_disk(&replaced.photo_ref));
}

#[tokio::test]
async fn test_append_without_profile_photo_becomes_first() {
    let f = seeded(vec![]).await;
    f.store
        .upsert(
            "g@example.com",
            ProfileUpdate {
                photos: Some(vec!["/uploads/gallery.png".to_string()]),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    let outcome = f
        .profiles
        .upload_photo(PhotoUpload {
            email: Some("g@example.com".to_string()),
            filter: Some("sepia".to_string()),
            is_additional: true,
            photo: Some(png("new.png")),
        })
        .await
        .unwrap();

    assert_eq!(
        outcome.user.profile_photo_url.as_deref(),
        Some(outcome.photo_ref.as_str())
    );
    assert_eq!(
        outcome.user.photos,
        vec![outcome.photo_ref.clone(), "/uploads/gallery.png".to_string()]
    );
    assert_eq!(outcome.user.profile_photo_filter.as_deref(), Some("sepia"));
}

#[tokio::test]
async fn test_submit_profile_ignores_photo_fields() {
    let f = seeded(vec![]).await;

    let mut body = submission("s@example.com", "S");
    body.profile.photos = Some(vec!["/uploads/gallery.png".to_string()]);
    body.profile.profile_photo_url = Some("/uploads/me.png".to_string());
    let user = f.profiles.submit_profile(body).await.unwrap();

    assert!(user.photos.is_empty());
    assert!(user.profile_photo_url.is_none());
    assert_eq!(user.display_name.as_deref(), Some("S"));
}

/// Reads from a real store but refuses every write.
struct ReadOnlyUsers(MemoryStore);

#[async_trait]
impl UserRepository for ReadOnlyUsers {
    async fn get_all(&self) -> Result<Vec<UserRecord>> {
        self.0.get_all().await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.0.get_by_email(email).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        self.0.get_by_id(id).await
    }

    async fn upsert(&self, _email: &str, _update: ProfileUpdate) -> Result<UserRecord> {
        Err(MochilaError::storage("data file is read-only"))
    }
}

#[tokio::test]
async fn test_failed_profile_update_removes_stored_photo() {
    let store = MemoryStore::new();
    store.seed(vec![member("1", Some("hy"), 50, 0)]).await;
    let uploads = TempDir::new().unwrap();
    let profiles = ProfileService::new(
        Arc::new(ReadOnlyUsers(store.clone())),
        Arc::new(LocalPhotoStorage::new(uploads.path())),
    );

    let err = profiles
        .upload_photo(PhotoUpload {
            email: Some("1@example.com".to_string()),
            photo: Some(png("a.png")),
            ..PhotoUpload::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_storage_unavailable());
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    let user = store.get_by_id("1").await.unwrap().unwrap();
    assert!(user.photos.is_empty());
}

/// Stores locally, but every delete fails.
struct UndeletablePhotos(LocalPhotoStorage);

#[async_trait]
impl PhotoStorage for UndeletablePhotos {
    async fn store(&self, photo: &PhotoFile) -> Result<String> {
        self.0.store(photo).await
    }

    async fn delete(&self, _reference: &str) -> Result<()> {
        Err(MochilaError::storage("bucket policy denies delete"))
    }

    fn describe(&self) -> String {
        "undeletable".to_string()
    }
}

#[tokio::test]
async fn test_replace_succeeds_when_old_photo_delete_fails() {
    let store = MemoryStore::new();
    store.seed(vec![member("1", Some("hy"), 50, 0)]).await;
    let uploads = TempDir::new().unwrap();
    let profiles = ProfileService::new(
        Arc::new(store.clone()),
        Arc::new(UndeletablePhotos(LocalPhotoStorage::new(uploads.path()))),
    );
    let upload = |name: &str| PhotoUpload {
        email: Some("1@example.com".to_string()),
        photo: Some(png(name)),
        ..PhotoUpload::default()
    };

    let first = profiles.upload_photo(upload("a.png")).await.unwrap();
    let second = profiles.upload_photo(upload("b.png")).await.unwrap();

    assert_eq!(second.user.photos, vec![second.photo_ref.clone()]);
    assert_eq!(
        second.user.profile_photo_url.as_deref(),
        Some(second.photo_ref.as_str())
    );
    assert_ne!(first.photo_ref, second.photo_ref);
}

#[tokio::test]
async fn test_photo_upload_validation_order() {
    let f = seeded(vec![]).await;

    let no_email = f
        .profiles
        .upload_photo(PhotoUpload {
            photo: Some(png("a.png")),
            ..PhotoUpload::default()
        })
        .await
        .unwrap_err();
    assert!(no_email.is_validation());

    let no_photo = f
        .profiles
        .upload_photo(PhotoUpload {
            email: Some("p@example.com".to_string()),
            ..PhotoUpload::default()
        })
        .await
        .unwrap_err();
    assert_eq!(no_photo.to_string(), "Photo file is required");

    let unknown = f
        .profiles
        .upload_photo(PhotoUpload {
            email: Some("nobody@example.com".to_string()),
            photo: Some(png("a.png")),
            ..PhotoUpload::default()
        })
        .await
        .unwrap_err();
    assert!(unknown.is_not_found());
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<VerificationEmail>>,
}

#[async_trait]
impl VerificationMailer for RecordingMailer {
    async fn send(&self, email: &VerificationEmail) -> Result<String> {
        self.sent.lock().unwrap().push(email.clone());
        Ok("test-message".to_string())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

#[tokio::test]
async fn test_verification_code_sent() {
    let mailer = Arc::new(RecordingMailer::default());
    let service = VerificationService::new(mailer.clone());

    let id = service
        .send_code(Some("a@example.com"), Some("123456"), None)
        .await
        .unwrap();
    assert_eq!(id, "test-message");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@example.com");
    assert!(sent[0].html.contains("123456"));
}

#[tokio::test]
async fn test_verification_rejects_bad_input() {
    let mailer = Arc::new(RecordingMailer::default());
    let service = VerificationService::new(mailer.clone());

    let missing = service.send_code(Some("a@example.com"), None, None).await.unwrap_err();
    assert_eq!(missing.to_string(), "Email and code are required");

    let invalid = service.send_code(Some("not-an-email"), Some("1"), None).await.unwrap_err();
    assert_eq!(invalid.to_string(), "Invalid email format");

    assert!(mailer.sent.lock().unwrap().is_empty());
}
