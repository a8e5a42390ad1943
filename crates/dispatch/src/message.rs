//! Push message construction.
//!
//! Pure functions mapping an event and its resolved names into a
//! `PushMessage`. Callers substitute the fallback constants before calling
//! so a message never references an undefined value.

use std::collections::HashMap;

use savora_common::types::PushMessage;

/// Substituted when an actor or author has no display name.
pub const FALLBACK_USER_NAME: &str = "Someone";

/// Substituted when a review carries no restaurant name.
pub const FALLBACK_RESTAURANT_NAME: &str = "a restaurant";

/// Message sent to a user who gained a follower.
pub fn follow_message(actor_name: &str) -> PushMessage {
    let mut data = HashMap::new();
    data.insert("type".to_string(), "follow".to_string());
    data.insert("screen".to_string(), "notificationsScreen".to_string());

    PushMessage {
        title: "New follower".to_string(),
        body: format!("{} is now following you", actor_name),
        data,
    }
}

/// Message fanned out to a review author's followers. `restaurant_id` is
/// carried in the data map for client-side routing, empty string when the
/// review has none.
pub fn review_message(
    author_name: &str,
    restaurant_name: &str,
    rating: f64,
    restaurant_id: &str,
) -> PushMessage {
    let mut data = HashMap::new();
    data.insert("type".to_string(), "review".to_string());
    data.insert("screen".to_string(), "homeScreen".to_string());
    data.insert("restaurantId".to_string(), restaurant_id.to_string());

    PushMessage {
        title: format!("New review from {}", author_name),
        body: format!(
            "{} rated {} {} stars",
            author_name, restaurant_name, rating
        ),
        data,
    }
}
