//! Like and footprint bookkeeping.

use chrono::NaiveDate;
use mochila_core::error::{MochilaError, Result};
use mochila_core::interaction::{
    FootprintRecord, InteractionRepository, LikeRecord, ResolvedFootprint, ResolvedLike,
};
use mochila_core::member::{MemberSummary, PhotoUrlResolver};
use mochila_core::user::{UserRecord, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;

/// Records likes and footprints and reads them back with the counterpart
/// member resolved.
///
/// Counter increments happen inside the repository together with the event
/// insert; this service only validates input and shapes results.
pub struct InteractionLedger {
    users: Arc<dyn UserRepository>,
    interactions: Arc<dyn InteractionRepository>,
    resolver: PhotoUrlResolver,
}

impl InteractionLedger {
    pub fn new(
        users: Arc<dyn UserRepository>,
        interactions: Arc<dyn InteractionRepository>,
        resolver: PhotoUrlResolver,
    ) -> Self {
        Self {
            users,
            interactions,
            resolver,
        }
    }

    /// Idempotent per ordered pair. Rejects blank ids before touching storage.
    pub async fn add_like(&self, from_user_id: &str, to_user_id: &str) -> Result<LikeRecord> {
        let (from, to) = (from_user_id.trim(), to_user_id.trim());
        if from.is_empty() || to.is_empty() {
            return Err(MochilaError::validation(
                "fromUserId and toUserId are required",
            ));
        }

        let like = self.interactions.add_like(from, to).await?;
        tracing::info!(from = %from, to = %to, like_id = %like.id, "Like recorded");
        Ok(like)
    }

    /// Appends a view record; repeat views by the same viewer each count.
    pub async fn add_footprint(&self, viewer_id: &str, viewed_id: &str) -> Result<FootprintRecord> {
        let footprint = self.interactions.add_footprint(viewer_id, viewed_id).await?;
        tracing::debug!(viewer = %viewer_id, viewed = %viewed_id, "Footprint recorded");
        Ok(footprint)
    }

    pub async fn likes_received(&self, user_id: &str) -> Result<Vec<ResolvedLike>> {
        self.likes_received_on(user_id, crate::today()).await
    }

    /// Likes addressed to `user_id`, newest first, each with the sender's summary.
    /// Likes whose sender no longer resolves are dropped.
    pub async fn likes_received_on(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<ResolvedLike>> {
        let mut likes = self.interactions.likes_to(user_id).await?;
        newest_first(&mut likes, |l| l.timestamp);

        let members = self.members_by_id().await?;
        Ok(likes
            .into_iter()
            .filter_map(|like| {
                let sender = members.get(like.from_user_id.as_str())?;
                Some(ResolvedLike {
                    user: MemberSummary::project(sender, &self.resolver, today),
                    like,
                })
            })
            .collect())
    }

    pub async fn footprints(&self, user_id: &str) -> Result<Vec<ResolvedFootprint>> {
        self.footprints_on(user_id, crate::today()).await
    }

    /// Views of `user_id`, newest first, each with the viewer's summary.
    /// Anonymous or vanished viewers are dropped.
    pub async fn footprints_on(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<ResolvedFootprint>> {
        let mut footprints = self.interactions.footprints_of(user_id).await?;
        newest_first(&mut footprints, |f| f.timestamp);

        let members = self.members_by_id().await?;
        Ok(footprints
            .into_iter()
            .filter_map(|footprint| {
                let viewer = members.get(footprint.viewer_id.as_str())?;
                Some(ResolvedFootprint {
                    user: MemberSummary::project(viewer, &self.resolver, today),
                    footprint,
                })
            })
            .collect())
    }

    async fn members_by_id(&self) -> Result<HashMap<String, UserRecord>> {
        Ok(self
            .users
            .get_all()
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect())
    }
}

/// Sorts by timestamp descending. Equal timestamps put the later insert first.
fn newest_first<T, K: Ord>(records: &mut [T], key: impl Fn(&T) -> K) {
    records.reverse();
    records.sort_by(|a, b| key(b).cmp(&key(a)));
}
