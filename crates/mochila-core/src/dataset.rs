//! The full user/like/footprint state and the rules that mutate it.
//!
//! Every storage adapter keeps one `Dataset` (in memory or serialized to a
//! file) and runs these methods inside its own critical section, so the
//! upsert merge, like idempotence and counter increments are written once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interaction::{FootprintRecord, LikeRecord};
use crate::user::{ProfileUpdate, UserRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub likes: Vec<LikeRecord>,
    #[serde(default)]
    pub footprints: Vec<FootprintRecord>,
}

/// Outcome of [`Dataset::record_like`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOutcome {
    pub like: LikeRecord,
    /// False when the pair already existed and nothing changed.
    pub created: bool,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_by_id(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == email)
    }

    fn user_by_id_mut(&mut self, id: &str) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Creates or merges the record for `email` and returns a copy of it.
    pub fn upsert_user(
        &mut self,
        email: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> UserRecord {
        let index = match self.users.iter().position(|u| u.email == email) {
            Some(index) => index,
            None => {
                self.users
                    .push(UserRecord::new(Uuid::new_v4().to_string(), email, now));
                self.users.len() - 1
            }
        };

        let record = &mut self.users[index];
        update.apply_to(record);
        record.updated_at = Some(now);
        record.clone()
    }

    /// Records `from -> to` unless that pair already exists.
    ///
    /// A missing target user is tolerated: the like is stored, there is just
    /// no counter to bump.
    pub fn record_like(
        &mut self,
        from_user_id: &str,
        to_user_id: &str,
        now: DateTime<Utc>,
    ) -> LikeOutcome {
        if let Some(existing) = self
            .likes
            .iter()
            .find(|l| l.from_user_id == from_user_id && l.to_user_id == to_user_id)
        {
            return LikeOutcome {
                like: existing.clone(),
                created: false,
            };
        }

        let like = LikeRecord {
            id: Uuid::new_v4().to_string(),
            from_user_id: from_user_id.to_string(),
            to_user_id: to_user_id.to_string(),
            timestamp: now,
        };
        self.likes.push(like.clone());

        if let Some(target) = self.user_by_id_mut(to_user_id) {
            target.likes_count = target.likes_count.saturating_add(1);
        }

        LikeOutcome {
            like,
            created: true,
        }
    }

    /// Appends a footprint and bumps the viewed member's `views_count`.
    pub fn record_footprint(
        &mut self,
        viewer_id: &str,
        viewed_id: &str,
        now: DateTime<Utc>,
    ) -> FootprintRecord {
        let footprint = FootprintRecord {
            id: Uuid::new_v4().to_string(),
            viewer_id: viewer_id.to_string(),
            viewed_id: viewed_id.to_string(),
            timestamp: now,
        };
        self.footprints.push(footprint.clone());

        if let Some(viewed) = self.user_by_id_mut(viewed_id) {
            viewed.views_count = viewed.views_count.saturating_add(1);
        }

        footprint
    }

    pub fn likes_to(&self, user_id: &str) -> Vec<LikeRecord> {
        self.likes
            .iter()
            .filter(|l| l.to_user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn footprints_of(&self, user_id: &str) -> Vec<FootprintRecord> {
        self.footprints
            .iter()
            .filter(|f| f.viewed_id == user_id)
            .cloned()
            .collect()
    }

    /// Inserts `records` whose email is not already present. Returns how many were added.
    pub fn seed(&mut self, records: Vec<UserRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.user_by_email(&record.email).is_none() && self.user_by_id(&record.id).is_none()
            {
                self.users.push(record);
                added += 1;
            }
        }
        added
    }
}
