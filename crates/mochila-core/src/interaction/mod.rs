//! Interaction domain module: likes and footprints (profile views).
//!
//! # Module Structure
//!
//! - `model`: `LikeRecord`, `FootprintRecord` and their resolved views
//! - `repository`: `InteractionRepository` trait for persistence

mod model;
pub mod repository;

pub use model::{FootprintRecord, LikeRecord, ResolvedFootprint, ResolvedLike};
pub use repository::InteractionRepository;
