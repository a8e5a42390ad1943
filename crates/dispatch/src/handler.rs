//! Event handlers — one single-shot reaction per triggering event type.
//!
//! Each handler runs Start → Resolve → Gate → Build → Send → Cleanup and
//! always reaches Done: every failure mode is logged and absorbed so the
//! trigger infrastructure never sees a partial failure as grounds for a
//! redelivery storm. Events may be redelivered (at-least-once source); a
//! duplicate push is an accepted cost and token cleanup is idempotent.

use std::sync::Arc;

use savora_common::types::{DocumentCreated, FollowEdge, Review};

use crate::delivery::PushDelivery;
use crate::dispatcher::PushDispatcher;
use crate::gate;
use crate::invalidator::TokenInvalidator;
use crate::message::{self, FALLBACK_RESTAURANT_NAME, FALLBACK_USER_NAME};
use crate::resolver::RecipientResolver;
use crate::store::ProfileStore;

/// Terminal result of one event's processing. Counts only — handlers never
/// surface errors to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Tokens a send was attempted against.
    pub attempted: usize,
    /// Tokens the provider accepted the message for.
    pub delivered: usize,
    /// Tokens cleared after a permanent failure.
    pub invalidated: usize,
}

/// Event consumer for document-created triggers.
pub struct NotificationHandlers {
    resolver: RecipientResolver,
    dispatcher: PushDispatcher,
    invalidator: TokenInvalidator,
}

impl NotificationHandlers {
    pub fn new(store: Arc<dyn ProfileStore>, delivery: Arc<dyn PushDelivery>) -> Self {
        Self {
            resolver: RecipientResolver::new(store.clone()),
            dispatcher: PushDispatcher::new(delivery),
            invalidator: TokenInvalidator::new(store),
        }
    }

    /// Route a queue event to its handler.
    pub async fn handle(&self, event: DocumentCreated) -> DispatchSummary {
        match event {
            DocumentCreated::Follow {
                recipient_id,
                actor_id,
                edge,
            } => {
                self.handle_follow_created(&recipient_id, &actor_id, edge.as_ref())
                    .await
            }
            DocumentCreated::Review { review_id, review } => {
                self.handle_review_created(&review_id, review.as_ref()).await
            }
        }
    }

    /// A follow edge was created: notify the followed user.
    pub async fn handle_follow_created(
        &self,
        recipient_id: &str,
        actor_id: &str,
        edge: Option<&FollowEdge>,
    ) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        if edge.is_none() {
            tracing::info!(recipient_id, actor_id, "Follow event without payload, skipping");
            return summary;
        }

        tracing::info!(actor_id, recipient_id, "Follow created");

        let actor = match self.resolver.resolve(actor_id).await {
            Ok(Some(actor)) => actor,
            Ok(None) => {
                tracing::warn!(actor_id, "Actor profile not found, no notification");
                return summary;
            }
            Err(e) => {
                tracing::error!(actor_id, error = %e, "Actor lookup failed");
                return summary;
            }
        };

        let recipient = match self.resolver.resolve(recipient_id).await {
            Ok(Some(recipient)) => recipient,
            Ok(None) => {
                tracing::warn!(recipient_id, "Recipient profile not found, no notification");
                return summary;
            }
            Err(e) => {
                tracing::error!(recipient_id, error = %e, "Recipient lookup failed");
                return summary;
            }
        };

        if !gate::is_eligible(&recipient) {
            tracing::info!(recipient_id, "Recipient not eligible, no notification");
            return summary;
        }
        // Gate guarantees the token is present.
        let token = recipient.notification_token.as_deref().unwrap_or_default();

        let actor_name = actor.name.as_deref().unwrap_or(FALLBACK_USER_NAME);
        let msg = message::follow_message(actor_name);

        summary.attempted = 1;
        let outcome = self.dispatcher.send_single(&msg, token).await;
        if outcome.is_delivered() {
            summary.delivered = 1;
        } else if outcome.is_permanent_failure() && self.invalidator.invalidate(recipient_id).await
        {
            summary.invalidated = 1;
        }

        summary
    }

    /// A review was created: fan out to the author's followers.
    pub async fn handle_review_created(
        &self,
        review_id: &str,
        review: Option<&Review>,
    ) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        let Some(review) = review else {
            tracing::info!(review_id, "Review event without payload, skipping");
            return summary;
        };

        tracing::info!(review_id, author_id = %review.author_id, "Review created");

        let followers = match self.resolver.resolve_followers(&review.author_id).await {
            Ok(followers) => followers,
            Err(e) => {
                tracing::error!(
                    author_id = %review.author_id,
                    error = %e,
                    "Follower listing failed, no notifications"
                );
                return summary;
            }
        };

        if followers.is_empty() {
            tracing::info!(review_id, "Author has no followers");
            return summary;
        }

        // Eligible recipients in listing order; indices line up with the
        // batch outcomes below.
        let mut recipient_ids = Vec::new();
        let mut tokens = Vec::new();
        for follower in &followers {
            if gate::is_eligible(follower) {
                if let Some(token) = &follower.notification_token {
                    recipient_ids.push(follower.id.clone());
                    tokens.push(token.clone());
                }
            } else {
                tracing::debug!(follower_id = %follower.id, "Follower not eligible");
            }
        }

        if tokens.is_empty() {
            tracing::info!(review_id, "No eligible follower tokens");
            return summary;
        }

        let author_name = review.author_name.as_deref().unwrap_or(FALLBACK_USER_NAME);
        let restaurant_name = review
            .restaurant_name
            .as_deref()
            .unwrap_or(FALLBACK_RESTAURANT_NAME);
        let restaurant_id = review.restaurant_id.as_deref().unwrap_or_default();
        let msg = message::review_message(author_name, restaurant_name, review.rating, restaurant_id);

        summary.attempted = tokens.len();
        let outcomes = match self.dispatcher.send_batch(&msg, &tokens).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(review_id, error = %e, "Multicast call failed wholesale");
                return summary;
            }
        };

        for (recipient_id, outcome) in recipient_ids.iter().zip(&outcomes) {
            if outcome.is_delivered() {
                summary.delivered += 1;
            } else if outcome.is_permanent_failure() {
                tracing::warn!(recipient_id = %recipient_id, "Token no longer registered, clearing");
                if self.invalidator.invalidate(recipient_id).await {
                    summary.invalidated += 1;
                }
            }
        }

        summary
    }
}
