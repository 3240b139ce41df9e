//! Application layer for mochila.
//!
//! Use cases that coordinate the repository and collaborator ports from
//! `mochila-core`. Nothing here knows which adapter is behind a port.

pub mod interaction_ledger;
pub mod member_service;
pub mod profile_service;
pub mod verification_service;

pub use interaction_ledger::InteractionLedger;
pub use member_service::MemberQueryService;
pub use profile_service::{PhotoUpload, PhotoUploadOutcome, ProfileService, ProfileSubmission};
pub use verification_service::VerificationService;

/// Viewer id recorded when a detail fetch names no viewer.
pub const ANONYMOUS_VIEWER: &str = "anonymous";

/// Today's date in UTC, used for age derivation.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
