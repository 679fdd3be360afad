//! Completion-provider seam and the OpenAI-compatible implementation.
//!
//! Both pipeline calls go through [`CompletionProvider::chat`]. The trait takes
//! the API key per call because the key is resolved per request (see
//! [`crate::config::AnalyzerConfig::resolve_api_key`]); providers hold only
//! connection settings.
//!
//! There is no retry here. A failed call fails the request, and the caller
//! decides whether to resubmit.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

// ── Wire types ───────────────────────────────────────────────────────────────

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// One chat message in the chat-completions format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// Message body: plain text, or a list of typed parts for multimodal input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user turn carrying an instruction and one attachment by URL.
    ///
    /// `url` may be a data URL; the upload is forwarded without re-encoding.
    pub fn user_with_image(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: url.into() },
                },
            ]),
        }
    }
}

/// Per-call sampling options.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// What a provider returns for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// First choice's message content. `None` when the model sent nothing.
    pub content: Option<String>,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ── Provider trait ───────────────────────────────────────────────────────────

/// A chat-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Send `messages` and return the first choice.
    async fn chat(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, ProviderError>;
}

// ── OpenAI-compatible implementation ─────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Provider for any endpoint speaking the OpenAI chat-completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl OpenAiProvider {
    /// Build a provider from the base URL and timeout in `config`.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: chat_completions_url(&config.base_url),
            timeout_secs: config.api_timeout_secs,
        })
    }
}

/// `{base}/chat/completions`, tolerating a trailing slash on `base`.
pub fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, ProviderError> {
        let body = ChatRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned HTTP {}: {}", self.endpoint, status, body);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    secs: self.timeout_secs,
                }
            } else {
                ProviderError::Decode(e.to_string())
            }
        })?;

        let usage = parsed.usage.unwrap_or(Usage {
            prompt_tokens: 0,
            completion_tokens: 0,
        });

        Ok(Completion {
            content: parsed.choices.into_iter().next().and_then(|c| c.message.content),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }
}

impl OpenAiProvider {
    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            ProviderError::Transport(e)
        }
    }
}
