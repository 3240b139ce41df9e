//! UserRecord domain model and the partial update applied by profile submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification consent captured during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotifications {
    pub all_agreed: bool,
    pub messages_agreed: bool,
    pub campaigns_agreed: bool,
}

impl Default for EmailNotifications {
    fn default() -> Self {
        Self {
            all_agreed: true,
            messages_agreed: true,
            campaigns_agreed: true,
        }
    }
}

/// One member profile, keyed by `id` and by the unique `email`.
///
/// Counters (`likes_count`, `views_count`) are only ever changed by the
/// interaction ledger. `match_rate` and `is_online` are maintained elsewhere
/// and treated as opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,

    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    /// Free-form date as submitted by the client (`YYYY-MM-DD` expected).
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub hometown: Option<String>,

    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub charm_points: Vec<String>,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub body_type: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub siblings: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub income: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub self_introduction: Option<String>,
    #[serde(default)]
    pub video_call_ok: bool,

    // Onboarding answers
    #[serde(default)]
    pub purpose_of_use: Vec<String>,
    #[serde(default)]
    pub travel_companion_preferences: Vec<String>,
    #[serde(default)]
    pub activity_interests: Vec<String>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub match_preference: Option<String>,
    #[serde(default)]
    pub how_did_you_learn: Option<String>,
    #[serde(default)]
    pub travel_destination: Option<String>,
    #[serde(default)]
    pub email_notifications: Option<EmailNotifications>,

    #[serde(default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub profile_photo_filter: Option<String>,
    /// Ordered photo references; `photos[0]` mirrors `profile_photo_url`.
    #[serde(default)]
    pub photos: Vec<String>,

    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub match_rate: i64,
    #[serde(default)]
    pub is_online: bool,

    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates an empty record for a first-time email.
    pub fn new(id: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
            age: None,
            birthday: None,
            gender: None,
            region: None,
            hometown: None,
            interests: Vec::new(),
            charm_points: Vec::new(),
            personality: Vec::new(),
            languages: Vec::new(),
            height: None,
            body_type: None,
            blood_type: None,
            siblings: None,
            occupation: None,
            income: None,
            education: None,
            self_introduction: None,
            video_call_ok: false,
            purpose_of_use: Vec::new(),
            travel_companion_preferences: Vec::new(),
            activity_interests: Vec::new(),
            personality_traits: Vec::new(),
            match_preference: None,
            how_did_you_learn: None,
            travel_destination: None,
            email_notifications: None,
            profile_photo_url: None,
            profile_photo_filter: None,
            photos: Vec::new(),
            likes_count: 0,
            views_count: 0,
            match_rate: 0,
            is_online: false,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Last activity timestamp used by the `login` ordering.
    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// True when the record carries the one field required for member listings.
    pub fn has_display_name(&self) -> bool {
        self.display_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// Partial profile update. Absent fields leave the stored value untouched.
///
/// Counters, `match_rate`, `is_online`, `id`, `email` and `created_at` are
/// deliberately not representable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub age: Option<u32>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub hometown: Option<String>,
    pub interests: Option<Vec<String>>,
    pub charm_points: Option<Vec<String>>,
    pub personality: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub height: Option<String>,
    pub body_type: Option<String>,
    pub blood_type: Option<String>,
    pub siblings: Option<String>,
    pub occupation: Option<String>,
    pub income: Option<String>,
    pub education: Option<String>,
    pub self_introduction: Option<String>,
    pub video_call_ok: Option<bool>,
    pub purpose_of_use: Option<Vec<String>>,
    pub travel_companion_preferences: Option<Vec<String>>,
    pub activity_interests: Option<Vec<String>>,
    pub personality_traits: Option<Vec<String>>,
    pub match_preference: Option<String>,
    pub how_did_you_learn: Option<String>,
    pub travel_destination: Option<String>,
    pub email_notifications: Option<EmailNotifications>,
    pub profile_photo_url: Option<String>,
    pub profile_photo_filter: Option<String>,
    /// Replaces the whole ordered sequence when present.
    pub photos: Option<Vec<String>>,
}

macro_rules! merge_optional {
    ($update:ident, $record:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $update.$field {
                $record.$field = Some(value);
            }
        )+
    };
}

macro_rules! merge_value {
    ($update:ident, $record:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $update.$field {
                $record.$field = value;
            }
        )+
    };
}

impl ProfileUpdate {
    /// Merges the supplied fields into `record`.
    ///
    /// Does not touch `updated_at`; the caller stamps the mutation.
    pub fn apply_to(self, record: &mut UserRecord) {
        let update = self;
        merge_optional!(
            update,
            record,
            display_name,
            age,
            birthday,
            gender,
            region,
            hometown,
            height,
            body_type,
            blood_type,
            siblings,
            occupation,
            income,
            education,
            self_introduction,
            match_preference,
            how_did_you_learn,
            travel_destination,
            email_notifications,
            profile_photo_url,
            profile_photo_filter,
        );
        merge_value!(
            update,
            record,
            interests,
            charm_points,
            personality,
            languages,
            video_call_ok,
            purpose_of_use,
            travel_companion_preferences,
            activity_interests,
            personality_traits,
            photos,
        );
    }

    /// Builds an update that only replaces the photo fields.
    pub fn photos(
        profile_photo_url: Option<String>,
        photos: Vec<String>,
        filter: Option<String>,
    ) -> Self {
        Self {
            profile_photo_url,
            photos: Some(photos),
            profile_photo_filter: filter,
            ..Self::default()
        }
    }
}
