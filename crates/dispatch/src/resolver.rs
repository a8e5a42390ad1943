//! Recipient resolution.
//!
//! Loads the profiles an event targets. For the follow event that is the
//! acting user and the recipient; for the review event it is the author's
//! follower set, where each follower is fetched independently and an
//! individual lookup failure skips that follower rather than aborting the
//! fan-out.

use std::sync::Arc;

use savora_common::types::UserProfile;

use crate::store::{ProfileStore, StoreError};

pub struct RecipientResolver {
    store: Arc<dyn ProfileStore>,
}

impl RecipientResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Resolve a single user's profile. `Ok(None)` means the document is
    /// missing — the caller logs and stops, no error surfaces.
    pub async fn resolve(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.store.get_profile(user_id).await
    }

    /// Resolve the profiles of a user's followers, preserving the order of
    /// the follower listing so batch outcomes map back to recipients.
    ///
    /// A per-follower lookup failure or missing document is logged and
    /// skipped; only a failure of the follower listing itself is returned
    /// as `Err`.
    pub async fn resolve_followers(
        &self,
        author_id: &str,
    ) -> Result<Vec<UserProfile>, StoreError> {
        let follower_ids = self.store.follower_ids(author_id).await?;

        let mut profiles = Vec::with_capacity(follower_ids.len());
        for follower_id in &follower_ids {
            match self.store.get_profile(follower_id).await {
                Ok(Some(profile)) => profiles.push(profile),
                Ok(None) => {
                    tracing::debug!(follower_id = %follower_id, "Follower profile missing, skipping");
                }
                Err(e) => {
                    tracing::warn!(
                        follower_id = %follower_id,
                        error = %e,
                        "Failed to load follower profile, skipping"
                    );
                }
            }
        }

        Ok(profiles)
    }
}
