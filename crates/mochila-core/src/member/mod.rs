//! Member listing domain: ordering, age derivation and the projections
//! handed to API consumers.

pub mod age;
pub mod ranking;
pub mod view;

pub use age::{age_on, derive_age, parse_birthday};
pub use ranking::{SortMode, popularity_score, sort_members};
pub use view::{MemberDetail, MemberSummary, PhotoUrlResolver, REGION_PLACEHOLDER};
