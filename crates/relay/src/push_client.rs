//! HTTP push-delivery adapter.
//!
//! Talks to the provider's send API and maps its error codes onto the
//! transient/permanent classification the dispatcher acts on. One HTTP
//! call per `send` / `send_multicast` invocation; no retries here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use savora_common::types::PushMessage;
use savora_dispatch::delivery::{DeliveryOutcome, MulticastResponse, PushDelivery, SendError};

/// Provider error codes meaning the token will never work again.
const PERMANENT_ERROR_CODES: &[&str] = &["UNREGISTERED", "INVALID_REGISTRATION_TOKEN"];

pub struct HttpPushClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    /// Provider-assigned message id.
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct MulticastHttpResponse {
    responses: Vec<TokenResponse>,
    #[serde(default)]
    success_count: usize,
    #[serde(default)]
    failure_count: usize,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

impl HttpPushClient {
    pub fn new(base_url: String, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn message_json(message: &PushMessage) -> serde_json::Value {
        json!({
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
        })
    }

    /// Map an HTTP status plus provider error code onto the dispatch
    /// classification. 404/410 mean the registration is gone even when the
    /// body carries no code.
    fn classify(status: StatusCode, detail: Option<&ErrorDetail>) -> SendError {
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return SendError::TokenNotRegistered;
        }
        if let Some(detail) = detail
            && PERMANENT_ERROR_CODES.contains(&detail.status.as_str())
        {
            return SendError::TokenNotRegistered;
        }
        let reason = detail
            .map(|d| {
                if d.message.is_empty() {
                    d.status.clone()
                } else {
                    d.message.clone()
                }
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        SendError::Transport(reason)
    }

    fn token_outcome(resp: TokenResponse) -> DeliveryOutcome {
        match (resp.message_id, resp.error) {
            (Some(message_id), None) => DeliveryOutcome::Delivered { message_id },
            (_, Some(error)) if PERMANENT_ERROR_CODES.contains(&error.status.as_str()) => {
                DeliveryOutcome::Failed(SendError::TokenNotRegistered)
            }
            (_, Some(error)) => {
                let reason = if error.message.is_empty() {
                    error.status
                } else {
                    error.message
                };
                DeliveryOutcome::Failed(SendError::Transport(reason))
            }
            (None, None) => DeliveryOutcome::Failed(SendError::Transport(
                "empty multicast result".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PushDelivery for HttpPushClient {
    async fn send(&self, message: &PushMessage, token: &str) -> Result<String, SendError> {
        let mut body = Self::message_json(message);
        body["token"] = json!(token);

        let response = self
            .client
            .post(format!("{}/v1/messages:send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "message": body }))
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let parsed: SendResponse = response
                .json()
                .await
                .map_err(|e| SendError::Transport(e.to_string()))?;
            return Ok(parsed.name);
        }

        let detail = response.json::<ErrorResponse>().await.ok().map(|e| e.error);
        Err(Self::classify(status, detail.as_ref()))
    }

    async fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> Result<MulticastResponse, SendError> {
        let mut body = Self::message_json(message);
        body["tokens"] = json!(tokens);

        let response = self
            .client
            .post(format!("{}/v1/messages:sendMulticast", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "message": body }))
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ErrorResponse>().await.ok().map(|e| e.error);
            return Err(Self::classify(status, detail.as_ref()));
        }

        let parsed: MulticastHttpResponse = response
            .json()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let outcomes: Vec<DeliveryOutcome> = parsed
            .responses
            .into_iter()
            .map(Self::token_outcome)
            .collect();

        Ok(MulticastResponse {
            outcomes,
            success_count: parsed.success_count,
            failure_count: parsed.failure_count,
        })
    }
}
