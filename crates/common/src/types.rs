use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A user's notification profile as stored in the profile store.
///
/// `notifications_enabled` is deliberately an `Option`: profiles created
/// before the preference existed carry no value, and those users must be
/// treated as enabled (see `savora-dispatch::gate`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub notification_token: Option<String>,
    pub notifications_enabled: Option<bool>,
}

/// A follow relationship: `follower_id` follows `followed_id`.
///
/// Creation of this edge is itself the trigger; the dispatcher never reads
/// any other attribute of it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub follower_id: String,
    pub followed_id: String,
}

/// A restaurant review. Created externally; read-only to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub author_id: String,
    pub author_name: Option<String>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub rating: f64,
}

/// Document-creation events as they appear on the relay's queue.
///
/// The document payload is optional on the wire: the trigger source may
/// deliver an event whose snapshot is missing, in which case handlers
/// no-op successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentCreated {
    Follow {
        /// The user being followed (notification recipient).
        recipient_id: String,
        /// The user who created the follow edge.
        actor_id: String,
        #[serde(default)]
        edge: Option<FollowEdge>,
    },
    Review {
        review_id: String,
        #[serde(default)]
        review: Option<Review>,
    },
}

/// Provider-agnostic push payload: a title/body notification plus a
/// string map the mobile clients use for routing (`type`, `screen`, and
/// entity identifiers). Constructed and consumed within one dispatch,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}
