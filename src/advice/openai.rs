//! OpenAI chat-completions client implementation.

use super::{build_prompt, AdviceError, AdviceSource, SYSTEM_PROMPT};
use crate::domain::ClosedTrade;
use crate::engine::Summary;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const MAX_TOKENS: u32 = 250;
const TEMPERATURE: f64 = 0.8;

/// Advice source backed by the OpenAI chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiAdviceSource {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiAdviceSource {
    /// Create a new OpenAI advice source.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    async fn post_chat(&self, payload: serde_json::Value) -> Result<ChatResponse, AdviceError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(AdviceError::NetworkError(e.to_string())))?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(AdviceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(AdviceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if status == 401 || status == 403 {
                return Err(backoff::Error::permanent(AdviceError::NotConfigured));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(AdviceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<ChatResponse>()
                .await
                .map_err(|e| backoff::Error::permanent(AdviceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl AdviceSource for OpenAiAdviceSource {
    async fn generate_advice(
        &self,
        summary: &Summary,
        recent_trades: &[ClosedTrade],
    ) -> Result<String, AdviceError> {
        debug!(
            "Requesting advice for count={}, recent={}",
            summary.count,
            recent_trades.len()
        );

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(summary, recent_trades) },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self.post_chat(payload).await?;
        let message = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AdviceError::ParseError("Empty completion".to_string()))?;

        Ok(message.to_string())
    }
}
