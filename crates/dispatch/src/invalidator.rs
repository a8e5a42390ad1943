//! Stale-token cleanup.
//!
//! Runs only after a delivery attempt classified permanent. The original
//! notification attempt is already over by then, so a cleanup failure is
//! logged and swallowed — it never becomes the event's failure.

use std::sync::Arc;

use crate::store::ProfileStore;

pub struct TokenInvalidator {
    store: Arc<dyn ProfileStore>,
}

impl TokenInvalidator {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Clear the stored token for `user_id`. Returns whether the store
    /// accepted the write. Clearing an already-cleared token is a store
    /// no-op, so duplicate deliveries and concurrent invalidations are safe.
    pub async fn invalidate(&self, user_id: &str) -> bool {
        match self.store.clear_token(user_id).await {
            Ok(()) => {
                tracing::info!(user_id, "Cleared unregistered notification token");
                true
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Token cleanup failed");
                false
            }
        }
    }
}
