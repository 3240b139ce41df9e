//! Sort keys for member listings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::user::UserRecord;

/// Listing order requested by the client.
///
/// Anything unrecognised falls back to `Popular`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// `match_rate + likes_count * 10`, descending.
    #[default]
    Popular,
    /// Most recently active first.
    Login,
    /// `match_rate`, descending.
    Recommended,
    /// Newest accounts first.
    New,
}

impl SortMode {
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }
}

pub fn popularity_score(user: &UserRecord) -> i64 {
    let likes = i64::try_from(user.likes_count).unwrap_or(i64::MAX);
    user.match_rate.saturating_add(likes.saturating_mul(10))
}

/// Sorts in place. The sort is stable, so ties keep their incoming order.
pub fn sort_members(users: &mut [UserRecord], mode: SortMode) {
    match mode {
        SortMode::Popular => users.sort_by(|a, b| popularity_score(b).cmp(&popularity_score(a))),
        SortMode::Login => users.sort_by(|a, b| b.last_active_at().cmp(&a.last_active_at())),
        SortMode::Recommended => users.sort_by(|a, b| b.match_rate.cmp(&a.match_rate)),
        SortMode::New => users.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn member(id: &str, match_rate: i64, likes: u64) -> UserRecord {
        let mut record = UserRecord::new(id, format!("{id}@example.com"), Utc::now());
        record.display_name = Some(id.to_string());
        record.match_rate = match_rate;
        record.likes_count = likes;
        record
    }

    fn ids(users: &[UserRecord]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_popular_weighs_likes() {
        let mut users = vec![member("a", 60, 2), member("b", 50, 5)];
        sort_members(&mut users, SortMode::Popular);
        assert_eq!(ids(&users), vec!["b", "a"]);
    }

    #[test]
    fn test_popular_ties_keep_input_order() {
        let mut users = vec![member("x", 70, 0), member("y", 60, 1), member("z", 70, 0)];
        sort_members(&mut users, SortMode::Popular);
        assert_eq!(ids(&users), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_recommended_ignores_likes() {
        let mut users = vec![member("a", 60, 20), member("b", 72, 0)];
        sort_members(&mut users, SortMode::Recommended);
        assert_eq!(ids(&users), vec!["b", "a"]);
    }

    #[test]
    fn test_new_and_login_orderings() {
        let now = Utc::now();
        let mut old = member("old", 0, 0);
        old.created_at = now - Duration::days(3);
        old.updated_at = Some(now);
        let mut fresh = member("fresh", 0, 0);
        fresh.created_at = now - Duration::days(1);
        fresh.updated_at = None;

        let mut users = vec![old.clone(), fresh.clone()];
        sort_members(&mut users, SortMode::New);
        assert_eq!(ids(&users), vec!["fresh", "old"]);

        let mut users = vec![fresh, old];
        sort_members(&mut users, SortMode::Login);
        assert_eq!(ids(&users), vec!["old", "fresh"]);
    }

    #[test]
    fn test_parse_falls_back_to_popular() {
        assert_eq!(SortMode::parse_or_default(Some("new")), SortMode::New);
        assert_eq!(SortMode::parse_or_default(Some("LOGIN")), SortMode::Login);
        assert_eq!(SortMode::parse_or_default(Some("random")), SortMode::Popular);
        assert_eq!(SortMode::parse_or_default(None), SortMode::Popular);
    }
}
