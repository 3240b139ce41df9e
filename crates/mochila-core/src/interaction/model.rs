//! Like and footprint records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::member::MemberSummary;

/// A like from one member to another. At most one exists per ordered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub timestamp: DateTime<Utc>,
}

/// One profile view. Repeat views by the same viewer each get a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintRecord {
    pub id: String,
    pub viewer_id: String,
    pub viewed_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A received like together with the member who sent it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLike {
    #[serde(flatten)]
    pub like: LikeRecord,
    pub user: MemberSummary,
}

/// A footprint together with the member who left it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFootprint {
    #[serde(flatten)]
    pub footprint: FootprintRecord,
    pub user: MemberSummary,
}
