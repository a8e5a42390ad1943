//! Profile store seam.
//!
//! The dispatcher treats user profiles as documents in an external store
//! with last-write-wins semantics. Adapters (PostgreSQL in `savora-relay`,
//! in-memory fakes in tests) implement this trait.

use async_trait::async_trait;
use thiserror::Error;

use savora_common::types::UserProfile;

/// Error from the external profile store.
#[derive(Debug, Clone, Error)]
#[error("profile store error: {0}")]
pub struct StoreError(pub String);

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a user's profile. `Ok(None)` means the document does not exist,
    /// which is a normal outcome for the dispatcher, not an error.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// List the ids of a user's followers, in stable order.
    async fn follower_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Clear the stored notification token for a user. Clearing an already
    /// absent token must be a no-op so duplicate invalidations are safe.
    async fn clear_token(&self, user_id: &str) -> Result<(), StoreError>;
}
