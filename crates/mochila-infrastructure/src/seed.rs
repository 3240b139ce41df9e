//! Sample members inserted into an empty store for development.

use chrono::{DateTime, Duration, Utc};
use mochila_core::user::UserRecord;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    name: &str,
    age: u32,
    region: &str,
    match_rate: i64,
    likes: u64,
    views: u64,
    online: bool,
    interests: &[&str],
    created_at: DateTime<Utc>,
) -> UserRecord {
    let mut record = UserRecord::new(id, format!("user{id}@example.com"), created_at);
    record.display_name = Some(name.to_string());
    record.age = Some(age);
    record.region = Some(region.to_string());
    record.match_rate = match_rate;
    record.likes_count = likes;
    record.views_count = views;
    record.is_online = online;
    record.interests = strings(interests);
    record
}

/// The five development members, created one day apart (newest first).
pub fn sample_members(now: DateTime<Utc>) -> Vec<UserRecord> {
    let day = Duration::days(1);

    let mut first = sample(
        "1",
        "hy",
        34,
        "東京",
        66,
        0,
        0,
        true,
        &["旅行", "海外旅行", "食べ歩き", "映画", "カフェ", "温泉"],
        now,
    );
    first.hometown = Some("岡山".to_string());
    first.video_call_ok = true;
    first.self_introduction = Some(
        "はじめまして! プロフィール読んで頂きありがとうございます! 真剣にお付き合い出来る方と出会いたいと思い始めました。"
            .to_string(),
    );
    first.height = Some("165cm".to_string());
    first.body_type = Some("普通".to_string());
    first.charm_points = strings(&["笑顔", "奥二重"]);
    first.personality = strings(&["優しい", "明るい", "誠実", "落ち着いている", "思いやりがある"]);
    first.languages = strings(&["日本語"]);
    first.blood_type = Some("O型".to_string());
    first.siblings = Some("兄弟なし".to_string());
    first.occupation = Some("会社員(大手企業)".to_string());
    first.income = Some("700万円以上~1000万円未満".to_string());
    first.education = Some("大学卒".to_string());

    vec![
        first,
        sample("2", "ユーザー2", 36, "東京", 72, 5, 3, false, &["旅行", "カフェ"], now - day),
        sample("3", "ユーザー3", 28, "東京", 62, 3, 2, true, &["映画", "散歩"], now - day * 2),
        sample("4", "ユーザー4", 31, "東京", 69, 4, 3, false, &["読書", "カフェ"], now - day * 3),
        sample("5", "ユーザー5", 31, "千葉", 64, 2, 3, true, &["旅行", "写真"], now - day * 4),
    ]
}
