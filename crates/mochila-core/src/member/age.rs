//! Age derivation from a stored birthday.

use chrono::{DateTime, Datelike, NaiveDate};

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and RFC 3339 timestamps.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Whole years elapsed between `birthday` and `today`. Never negative.
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Returns `age` when known, otherwise derives it from `birthday`.
pub fn derive_age(age: Option<u32>, birthday: Option<&str>, today: NaiveDate) -> Option<u32> {
    age.or_else(|| birthday.and_then(parse_birthday).map(|b| age_on(b, today)))
}
