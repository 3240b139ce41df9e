//! Externally presentable projections of a `UserRecord`.
//!
//! Projections only read the record; photo references are rewritten on the
//! copy handed out, never in storage.

use chrono::NaiveDate;
use serde::Serialize;

use super::age::derive_age;
use crate::user::{EmailNotifications, UserRecord};

/// Shown in listings when a member has not filled in a region.
pub const REGION_PLACEHOLDER: &str = "未設定";

/// Turns store-relative photo references into absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUrlResolver {
    base_url: String,
}

impl PhotoUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// References that already carry a scheme (`https://…`) pass through.
    pub fn absolutize(&self, reference: &str) -> String {
        if has_scheme(reference) {
            return reference.to_string();
        }
        if reference.starts_with('/') {
            format!("{}{}", self.base_url, reference)
        } else {
            format!("{}/{}", self.base_url, reference)
        }
    }

    fn absolutize_opt(&self, reference: Option<&str>) -> Option<String> {
        reference
            .filter(|r| !r.is_empty())
            .map(|r| self.absolutize(r))
    }
}

fn has_scheme(reference: &str) -> bool {
    reference.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Row of the member list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: String,
    pub display_name: String,
    pub age: Option<u32>,
    pub region: String,
    pub profile_photo_url: Option<String>,
    pub is_online: bool,
    pub likes_count: u64,
    pub views_count: u64,
    pub match_rate: i64,
}

impl MemberSummary {
    pub fn project(user: &UserRecord, resolver: &PhotoUrlResolver, today: NaiveDate) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            age: derive_age(user.age, user.birthday.as_deref(), today),
            region: user
                .region
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| REGION_PLACEHOLDER.to_string()),
            profile_photo_url: resolver.absolutize_opt(user.profile_photo_url.as_deref()),
            is_online: user.is_online,
            likes_count: user.likes_count,
            views_count: user.views_count,
            match_rate: user.match_rate,
        }
    }
}

/// Full profile as shown on the member detail screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    pub id: String,
    pub display_name: Option<String>,
    pub age: Option<u32>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub hometown: Option<String>,
    pub profile_photo_url: Option<String>,
    pub profile_photo_filter: Option<String>,
    pub photos: Vec<String>,
    pub is_online: bool,
    pub match_rate: i64,
    pub interests: Vec<String>,
    pub video_call_ok: bool,
    pub self_introduction: Option<String>,
    pub height: Option<String>,
    pub body_type: Option<String>,
    pub charm_points: Vec<String>,
    pub personality: Vec<String>,
    pub languages: Vec<String>,
    pub blood_type: Option<String>,
    pub siblings: Option<String>,
    pub occupation: Option<String>,
    pub income: Option<String>,
    pub education: Option<String>,
    pub purpose_of_use: Vec<String>,
    pub travel_companion_preferences: Vec<String>,
    pub activity_interests: Vec<String>,
    pub personality_traits: Vec<String>,
    pub match_preference: Option<String>,
    pub travel_destination: Option<String>,
    pub email_notifications: Option<EmailNotifications>,
    pub likes_count: u64,
    pub views_count: u64,
}

impl MemberDetail {
    pub fn project(user: &UserRecord, resolver: &PhotoUrlResolver, today: NaiveDate) -> Self {
        // Older records may only carry the single profile photo.
        let photos = if user.photos.is_empty() {
            user.profile_photo_url
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| resolver.absolutize(p))
                .collect()
        } else {
            user.photos.iter().map(|p| resolver.absolutize(p)).collect()
        };

        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
            age: derive_age(user.age, user.birthday.as_deref(), today),
            birthday: user.birthday.clone(),
            gender: user.gender.clone(),
            region: user.region.clone(),
            hometown: user.hometown.clone(),
            profile_photo_url: resolver.absolutize_opt(user.profile_photo_url.as_deref()),
            profile_photo_filter: user.profile_photo_filter.clone(),
            photos,
            is_online: user.is_online,
            match_rate: user.match_rate,
            interests: user.interests.clone(),
            video_call_ok: user.video_call_ok,
            self_introduction: user.self_introduction.clone(),
            height: user.height.clone(),
            body_type: user.body_type.clone(),
            charm_points: user.charm_points.clone(),
            personality: user.personality.clone(),
            languages: user.languages.clone(),
            blood_type: user.blood_type.clone(),
            siblings: user.siblings.clone(),
            occupation: user.occupation.clone(),
            income: user.income.clone(),
            education: user.education.clone(),
            purpose_of_use: user.purpose_of_use.clone(),
            travel_companion_preferences: user.travel_companion_preferences.clone(),
            activity_interests: user.activity_interests.clone(),
            personality_traits: user.personality_traits.clone(),
            match_preference: user.match_preference.clone(),
            travel_destination: user.travel_destination.clone(),
            email_notifications: user.email_notifications.clone(),
            likes_count: user.likes_count,
            views_count: user.views_count,
        }
    }
}
