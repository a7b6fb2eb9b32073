//! OpenAI-compatible chat completions transport.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use crate::chat::cost::Usage;
use crate::chat::session::{ChatCompletion, ChatRequest, ChatTransport};
use crate::config::Config;
use crate::error::ChatError;

/// Maximum number of response-body characters kept in an API error.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Sends chat requests to `{base_url}/chat/completions`.
pub struct OpenAiTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// Build a transport from the resolved configuration.
    ///
    /// Fails with `ChatError::MissingApiKey` when no key is configured.
    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let api_key = config.api_key.clone().ok_or(ChatError::MissingApiKey)?;
        Ok(Self::new(config.base_url.clone(), api_key, config.timeout))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn exchange(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError> {
        let body = CompletionRequest {
            model: &request.model,
            messages: [
                Message {
                    role: "system",
                    content: &request.system_message,
                },
                Message {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ChatError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let text = response.text().await.map_err(ChatError::Http)?;
        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        Ok(ChatCompletion {
            content,
            usage: parsed.usage,
        })
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError> {
        debug!("POST {} (model {})", self.endpoint(), request.model);

        timeout(self.timeout, self.exchange(request))
            .await
            .map_err(|_| ChatError::Timeout(self.timeout.as_secs()))?
    }
}
