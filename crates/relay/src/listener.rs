//! Redis queue listener.
//!
//! Consumes document-created events with `BLPOP` and hands each one to the
//! dispatch handlers in its own task — events are independent units of work
//! with no ordering guarantee between them. The queue is at-least-once:
//! redelivered events are safe because handlers tolerate duplicates and
//! token cleanup is idempotent.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use uuid::Uuid;

use savora_common::types::DocumentCreated;
use savora_dispatch::handler::NotificationHandlers;

pub struct EventListener {
    redis: ConnectionManager,
    handlers: Arc<NotificationHandlers>,
    queue_key: String,
    dead_letter_key: String,
    poll_timeout_secs: u64,
}

impl EventListener {
    pub fn new(
        redis: ConnectionManager,
        handlers: Arc<NotificationHandlers>,
        queue_key: String,
        dead_letter_key: String,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            redis,
            handlers,
            queue_key,
            dead_letter_key,
            poll_timeout_secs,
        }
    }

    /// Decode one queue payload.
    pub fn decode_event(payload: &str) -> Result<DocumentCreated, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Consume the queue until the task is cancelled.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(
            queue = %self.queue_key,
            "Event listener started"
        );

        loop {
            // BLPOP returns (key, payload); None on timeout.
            let popped: Option<(String, String)> = redis::cmd("BLPOP")
                .arg(&self.queue_key)
                .arg(self.poll_timeout_secs)
                .query_async(&mut self.redis)
                .await?;

            let Some((_, payload)) = popped else {
                continue;
            };

            match Self::decode_event(&payload) {
                Ok(event) => {
                    // Correlation id for the spawned unit of work.
                    let event_id = Uuid::new_v4();
                    let handlers = self.handlers.clone();
                    tokio::spawn(async move {
                        let summary = handlers.handle(event).await;
                        tracing::info!(
                            event_id = %event_id,
                            attempted = summary.attempted,
                            delivered = summary.delivered,
                            invalidated = summary.invalidated,
                            "Event processed"
                        );
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Malformed event payload, parking on dead letter");
                    let pushed: Result<(), redis::RedisError> = redis::cmd("LPUSH")
                        .arg(&self.dead_letter_key)
                        .arg(&payload)
                        .query_async(&mut self.redis)
                        .await;
                    if let Err(e) = pushed {
                        tracing::error!(error = %e, "Failed to park payload on dead letter");
                    }
                }
            }
        }
    }
}
