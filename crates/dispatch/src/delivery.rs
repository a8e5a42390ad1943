//! Push delivery seam and outcome classification.
//!
//! The provider is an external send API. The only distinction the pipeline
//! cares about is transient vs. permanent failure: a permanent failure
//! means the token will never work again and must be cleared from the
//! recipient's profile.

use async_trait::async_trait;
use thiserror::Error;

use savora_common::types::PushMessage;

/// Classified delivery error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// Provider or network failure; the token may still be valid.
    #[error("push transport error: {0}")]
    Transport(String),

    /// The token is no longer registered with the provider (uninstalled
    /// app, expired registration). Permanent — the token must be cleared.
    #[error("registration token no longer valid")]
    TokenNotRegistered,
}

impl SendError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, SendError::TokenNotRegistered)
    }
}

/// Per-token result of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered {
        /// Provider-assigned message id, for log correlation.
        message_id: String,
    },
    Failed(SendError),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn is_permanent_failure(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed(e) if e.is_permanent())
    }
}

/// Per-token results of one multicast call, aligned by index with the
/// token list that was sent.
#[derive(Debug, Clone)]
pub struct MulticastResponse {
    pub outcomes: Vec<DeliveryOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
}

#[async_trait]
pub trait PushDelivery: Send + Sync {
    /// Send one message to one token. Returns the provider message id.
    async fn send(&self, message: &PushMessage, token: &str) -> Result<String, SendError>;

    /// Send one message to several tokens in a single provider call.
    /// An `Err` here is a wholesale transport failure of the call itself,
    /// distinct from per-token failures inside the response.
    async fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> Result<MulticastResponse, SendError>;
}
