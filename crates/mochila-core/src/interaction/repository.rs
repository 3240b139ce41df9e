//! Interaction repository trait.

use super::model::{FootprintRecord, LikeRecord};
use crate::error::Result;
use async_trait::async_trait;

/// An append-only ledger of likes and footprints.
///
/// # Implementation Notes
///
/// `add_like` and `add_footprint` write the event and bump the target's
/// counter as one unit: concurrent callers must never lose an increment,
/// and a failed write must leave neither the event nor the increment behind.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Records a like. A repeat for the same ordered pair returns the existing
    /// record and leaves `likes_count` untouched.
    async fn add_like(&self, from_user_id: &str, to_user_id: &str) -> Result<LikeRecord>;

    /// Appends a footprint and increments the viewed member's `views_count`.
    async fn add_footprint(&self, viewer_id: &str, viewed_id: &str) -> Result<FootprintRecord>;

    /// Likes whose target is `user_id`, in insertion order.
    async fn likes_to(&self, user_id: &str) -> Result<Vec<LikeRecord>>;

    /// Footprints left on `user_id`'s profile, in insertion order.
    async fn footprints_of(&self, user_id: &str) -> Result<Vec<FootprintRecord>>;
}
