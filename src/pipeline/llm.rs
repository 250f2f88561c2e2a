//! Summarization call: one chat-completion request per document.
//!
//! The endpoint speaks the OpenAI chat-completions shape:
//!
//! ```text
//! → {"model": "...", "messages": [{"role": "user", "content": PROMPT + text}]}
//! ← {"choices": [{"message": {"content": "..."}}]}
//! ```
//!
//! Exactly one attempt is made; there is no retry, backoff or streaming.
//! Failures come back as [`UpstreamError`] and the caller decides whether
//! they are fatal (see [`crate::config::UpstreamFailurePolicy`]).

use crate::config::ServiceConfig;
use crate::error::{DocIntelError, UpstreamError};
use crate::prompts::summary_message;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the completion endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl CompletionClient {
    /// Build a client from the service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, DocIntelError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.api_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| DocIntelError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Ask the model for a plain-language bullet summary of `text`.
    ///
    /// Returns the first choice's content, trimmed.
    pub async fn summarize(&self, text: &str) -> Result<String, UpstreamError> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: summary_message(text),
            }],
        };

        info!(
            "Requesting summary from {} ({} chars, model {})",
            self.api_url,
            text.len(),
            self.model
        );

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Error calling summarization API: {}", e);
                UpstreamError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Summarization API error: {} {}", status.as_u16(), body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!("Unreadable summarization response: {}", e);
            UpstreamError::MalformedResponse(e.to_string())
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                UpstreamError::MalformedResponse("response has no choices[0].message.content".into())
            })?;

        debug!(
            "Summary: {} chars in {:?}",
            content.len(),
            start.elapsed()
        );
        Ok(content.trim().to_string())
    }
}

/// Text shown to the caller in place of a summary when the call fails and
/// the policy is `Degrade`.
pub fn degraded_summary(err: &UpstreamError) -> String {
    format!("Error summarizing text: {err}")
}
