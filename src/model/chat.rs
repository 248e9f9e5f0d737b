use super::{Prompt, TextModel};
use crate::config::ForgeConfig;
use crate::error::ErrorContext;
use crate::types::Message;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// OpenAI-compatible chat-completions client.
pub struct ChatModelClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
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

impl ChatModelClient {
    /// Build a client from configuration. Fails when no API key is configured.
    pub fn new(config: &ForgeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "GROQ_API_KEY not found in environment variables",
                    ErrorContext::new().with_field_path("api_key"),
                )
            })?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    "Invalid proxy URL",
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_details(e.to_string()),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COMPLETIONS_PATH)
    }
}

#[async_trait]
impl TextModel for ChatModelClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let body = CompletionRequest {
            model: &prompt.settings.model,
            messages: prompt.messages(),
            temperature: prompt.settings.temperature,
            max_tokens: prompt.settings.max_tokens,
            top_p: prompt.settings.top_p,
        };
        debug!(
            request_id = %request_id,
            model = %prompt.settings.model,
            prompt_chars = prompt.text.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("x-request-id", &request_id)
            .json(&body)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::upstream_with_context(
                format!("HTTP {}: {}", status.as_u16(), remote_message(&text)),
                ErrorContext::new()
                    .with_source("chat_client")
                    .with_details(request_id),
            ));
        }

        let parsed: CompletionResponse = response.json().await.map_err(TransportError::Http)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                Error::upstream_with_context(
                    "No response from model API",
                    ErrorContext::new().with_source("chat_client"),
                )
            })?;

        debug!(request_id = %request_id, reply_chars = content.len(), "chat completion received");
        Ok(content)
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

/// Pull `error.message` out of an OpenAI-style error body, else the raw text.
fn remote_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
