//! User repository trait.
//!
//! Defines the interface for user record persistence.

use super::model::{ProfileUpdate, UserRecord};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store of user records, keyed by `id` and by unique `email`.
///
/// Implementations never validate field values and never retry; an
/// unreachable backend surfaces as `MochilaError::StorageUnavailable`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists every stored record, unfiltered and in insertion order.
    async fn get_all(&self) -> Result<Vec<UserRecord>>;

    /// Finds a record by its unique email.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UserRecord))`: Record found
    /// - `Ok(None)`: No record for this email
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Finds a record by id.
    async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>>;

    /// Creates the record for an unseen email, or merges `update` into the
    /// existing one. Refreshes `updated_at` either way.
    async fn upsert(&self, email: &str, update: ProfileUpdate) -> Result<UserRecord>;
}
