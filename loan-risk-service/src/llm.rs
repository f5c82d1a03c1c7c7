//! Chat-completion client for OpenAI-compatible endpoints (Groq by default).
//!
//! The relay only needs one call shape: a single user message in, the first choice's text out.
//! [`CompletionClient`] is the seam the relay depends on, so handlers and tests can swap the
//! HTTP-backed [`GroqClient`] for something else.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::Result;

pub const TEMPERATURE: f64 = 1.0;
pub const MAX_COMPLETION_TOKENS: u32 = 1024;
pub const TOP_P: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a `POST /chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_completion_tokens: u32,
    pub top_p: f64,
    pub stream: bool,
    /// Always serialized, as `null` when unset.
    pub stop: Option<Vec<String>>,
}

impl ChatCompletionRequest {
    /// A non-streaming request carrying one user message and the fixed sampling settings.
    pub fn single_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            top_p: TOP_P,
            stream: false,
            stop: None,
        }
    }
}

// Upstream fields may be absent or explicitly `null`; both decode to the empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty_choices<'de, D>(deserializer: D) -> std::result::Result<Vec<Choice>, D::Error>
where
    D: Deserializer<'de>,
{
    let choices = Option::<Vec<Option<Choice>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(choices.into_iter().map(Option::unwrap_or_default).collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, deserialize_with = "null_as_empty_choices")]
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the service returned any choice at all.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_deref().unwrap_or_default())
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier placed in every outbound request.
    fn model(&self) -> &str;

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}

/// [`CompletionClient`] backed by `reqwest`, authenticating with a bearer token.
pub struct GroqClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
            config.request_timeout,
        )
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        info!(url = %self.api_url, model = %request.model, "Sending chat completion request");

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        // Error bodies are decoded like any other; one without choices falls through to the
        // caller's empty-answer handling.
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Completion service returned a non-success status");
        }

        let body = response.bytes().await?;
        let completion: ChatCompletionResponse = serde_json::from_slice(&body)?;

        info!(choices = completion.choices.len(), "Chat completion received");
        Ok(completion)
    }
}
