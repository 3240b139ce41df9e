//! Photo storage adapters.

mod local;
mod s3;

pub use local::{LocalPhotoStorage, UPLOADS_PREFIX};
pub use s3::S3PhotoStorage;

use rand::Rng;

/// `<millis>-<random>` suffix that keeps generated object names unique.
pub(crate) fn unique_suffix() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random: u64 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{millis}-{random}")
}

/// `.ext` taken from the original file name, or empty when it has none.
pub(crate) fn dotted_extension(photo: &mochila_core::photo::PhotoFile) -> String {
    photo
        .extension()
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
