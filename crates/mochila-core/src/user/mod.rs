//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: `UserRecord` and the partial `ProfileUpdate`
//! - `repository`: `UserRepository` trait for persistence

mod model;
pub mod repository;

pub use model::{EmailNotifications, ProfileUpdate, UserRecord};
pub use repository::UserRepository;
