//! Domain layer for Mochila.
//!
//! Records, the repository and port traits that adapters implement, and the
//! pure rules (ranking, age derivation, projections) shared by every backend.

pub mod dataset;
pub mod error;
pub mod interaction;
pub mod mail;
pub mod member;
pub mod photo;
pub mod user;

pub use error::{MochilaError, Result};
