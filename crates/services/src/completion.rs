use std::env;

use async_trait::async_trait;
use reqwest::Client;
use sat_core::model::RawCompletion;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-405B-Instruct-Turbo";

/// Sends one prompt to a hosted language model and returns its text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// # Errors
    ///
    /// Returns `CompletionError` when the client is disabled, the request fails,
    /// or the response carries no content.
    async fn complete(&self, prompt: &str) -> Result<RawCompletion, CompletionError>;
}

#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl CompletionConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Read `SAT_AI_API_KEY`, `SAT_AI_BASE_URL` and `SAT_AI_MODEL`.
    /// Returns `None` when no key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("SAT_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("SAT_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("SAT_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: Option<CompletionConfig>,
}

impl ChatCompletionClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CompletionConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<CompletionConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    /// Post `prompt` as a single user message and return the first choice, trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Disabled` without a config, `HttpStatus` on a
    /// non-2xx reply, and `EmptyResponse` when the first choice has no text.
    async fn complete(&self, prompt: &str) -> Result<RawCompletion, CompletionError> {
        let config = self.config.as_ref().ok_or(CompletionError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %config.model, "sending completion request");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CompletionError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(RawCompletion::new(content))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_client_refuses_to_send() {
        let client = ChatCompletionClient::new(None);
        assert!(!client.enabled());
        let result = client.complete("hi").await;
        assert!(matches!(result, Err(CompletionError::Disabled)));
    }

    #[test]
    fn config_defaults_to_hosted_llama() {
        let config = CompletionConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
