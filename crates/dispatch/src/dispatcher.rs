//! Delivery dispatch — single and multicast sends.
//!
//! One external send operation per invocation (one provider call per chunk
//! for multicast); no retries. Remediation of failed outcomes belongs to
//! the event handlers.

use std::sync::Arc;

use savora_common::types::PushMessage;

use crate::delivery::{DeliveryOutcome, PushDelivery, SendError};

/// Maximum tokens per multicast provider call. Larger batches are split so
/// an unbounded follower set never exceeds the provider's batch limit.
pub const MAX_MULTICAST_TOKENS: usize = 500;

pub struct PushDispatcher {
    delivery: Arc<dyn PushDelivery>,
}

impl PushDispatcher {
    pub fn new(delivery: Arc<dyn PushDelivery>) -> Self {
        Self { delivery }
    }

    /// Send to one recipient. Never escapes an error — the classified
    /// outcome is returned for the caller to act on.
    pub async fn send_single(&self, message: &PushMessage, token: &str) -> DeliveryOutcome {
        match self.delivery.send(message, token).await {
            Ok(message_id) => {
                tracing::info!(message_id = %message_id, "Push delivered");
                DeliveryOutcome::Delivered { message_id }
            }
            Err(e) => {
                tracing::warn!(error = %e, permanent = e.is_permanent(), "Push delivery failed");
                DeliveryOutcome::Failed(e)
            }
        }
    }

    /// Send one message to a batch of tokens.
    ///
    /// Returns one outcome per input token, aligned by index — partial
    /// failure is the expected common case. An `Err` is a wholesale
    /// transport failure of a provider call, distinct from per-token
    /// failures.
    pub async fn send_batch(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> Result<Vec<DeliveryOutcome>, SendError> {
        let mut outcomes = Vec::with_capacity(tokens.len());

        for chunk in tokens.chunks(MAX_MULTICAST_TOKENS) {
            let response = self.delivery.send_multicast(message, chunk).await?;

            tracing::info!(
                batch = chunk.len(),
                success = response.success_count,
                failure = response.failure_count,
                "Multicast batch sent"
            );

            // The provider contract is one result per token; tolerate a
            // misbehaving response by padding/truncating to the chunk size
            // so outcome-to-token alignment survives.
            let mut chunk_outcomes = response.outcomes;
            if chunk_outcomes.len() != chunk.len() {
                tracing::warn!(
                    expected = chunk.len(),
                    got = chunk_outcomes.len(),
                    "Multicast response count mismatch"
                );
                chunk_outcomes.truncate(chunk.len());
                while chunk_outcomes.len() < chunk.len() {
                    chunk_outcomes.push(DeliveryOutcome::Failed(SendError::Transport(
                        "missing result in multicast response".to_string(),
                    )));
                }
            }

            outcomes.extend(chunk_outcomes);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::delivery::MulticastResponse;

    /// Fake provider recording call sizes and answering from a script.
    struct ScriptedDelivery {
        /// Outcome per token, keyed by token value.
        script: HashMap<String, SendError>,
        /// Tokens of each multicast call, in call order.
        calls: Mutex<Vec<usize>>,
        /// When set, drop this many trailing results from each response.
        short_by: usize,
    }

    impl ScriptedDelivery {
        fn new(script: HashMap<String, SendError>) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
                short_by: 0,
            }
        }

        fn outcome_for(&self, token: &str) -> DeliveryOutcome {
            match self.script.get(token) {
                Some(e) => DeliveryOutcome::Failed(e.clone()),
                None => DeliveryOutcome::Delivered {
                    message_id: format!("msg-{}", token),
                },
            }
        }
    }

    #[async_trait]
    impl PushDelivery for ScriptedDelivery {
        async fn send(&self, _message: &PushMessage, token: &str) -> Result<String, SendError> {
            match self.script.get(token) {
                Some(e) => Err(e.clone()),
                None => Ok(format!("msg-{}", token)),
            }
        }

        async fn send_multicast(
            &self,
            _message: &PushMessage,
            tokens: &[String],
        ) -> Result<MulticastResponse, SendError> {
            self.calls.lock().unwrap().push(tokens.len());
            let mut outcomes: Vec<DeliveryOutcome> =
                tokens.iter().map(|t| self.outcome_for(t)).collect();
            outcomes.truncate(tokens.len().saturating_sub(self.short_by));
            let success = outcomes.iter().filter(|o| o.is_delivered()).count();
            let failure = outcomes.len() - success;
            Ok(MulticastResponse {
                outcomes,
                success_count: success,
                failure_count: failure,
            })
        }
    }

    fn message() -> PushMessage {
        crate::message::follow_message("Alice")
    }

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("T{}", i)).collect()
    }

    #[tokio::test]
    async fn test_single_success_and_failure() {
        let mut script = HashMap::new();
        script.insert("bad".to_string(), SendError::TokenNotRegistered);
        let dispatcher = PushDispatcher::new(Arc::new(ScriptedDelivery::new(script)));

        let ok = dispatcher.send_single(&message(), "good").await;
        assert_eq!(
            ok,
            DeliveryOutcome::Delivered {
                message_id: "msg-good".to_string()
            }
        );

        let gone = dispatcher.send_single(&message(), "bad").await;
        assert!(gone.is_permanent_failure());
    }

    #[tokio::test]
    async fn test_batch_outcome_count_matches_input() {
        let mut script = HashMap::new();
        script.insert("T1".to_string(), SendError::TokenNotRegistered);
        script.insert("T3".to_string(), SendError::Transport("503".to_string()));
        let dispatcher = PushDispatcher::new(Arc::new(ScriptedDelivery::new(script)));

        let outcomes = dispatcher.send_batch(&message(), &tokens(5)).await.unwrap();
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes[0].is_delivered());
        assert!(outcomes[1].is_permanent_failure());
        assert!(outcomes[2].is_delivered());
        assert!(!outcomes[3].is_delivered());
        assert!(!outcomes[3].is_permanent_failure());
        assert!(outcomes[4].is_delivered());
    }

    #[tokio::test]
    async fn test_batch_chunks_at_provider_limit() {
        let delivery = Arc::new(ScriptedDelivery::new(HashMap::new()));
        let dispatcher = PushDispatcher::new(delivery.clone());

        let outcomes = dispatcher
            .send_batch(&message(), &tokens(1200))
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1200);
        assert_eq!(*delivery.calls.lock().unwrap(), vec![500, 500, 200]);
    }

    #[tokio::test]
    async fn test_short_response_padded_with_transport_failures() {
        let mut delivery = ScriptedDelivery::new(HashMap::new());
        delivery.short_by = 2;
        let dispatcher = PushDispatcher::new(Arc::new(delivery));

        let outcomes = dispatcher.send_batch(&message(), &tokens(4)).await.unwrap();
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].is_delivered());
        assert!(outcomes[1].is_delivered());
        assert!(!outcomes[2].is_delivered());
        assert!(!outcomes[2].is_permanent_failure());
        assert!(!outcomes[3].is_delivered());
    }
}
