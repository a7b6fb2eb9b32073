//! Caller-owned chat sessions between a non-interactive driver and a responder.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chat::cost::{Cost, Usage};
use crate::error::ChatError;

/// A responder identity: a name plus the fixed behavioral instruction
/// (system message) it answers under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responder {
    pub name: String,
    pub system_message: String,
}

impl Responder {
    pub fn new(name: impl Into<String>, system_message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_message: system_message.into(),
        }
    }
}

/// One request sent through a [`ChatTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub system_message: String,
    pub prompt: String,
}

/// Raw provider answer: the terminal message (if any) and usage accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<Usage>,
}

/// The result of a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub cost: Cost,
}

/// Trait for sending a single chat request to an LLM provider.
///
/// This abstraction allows substituting the HTTP provider in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Perform one request/response round trip.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError>;
}

/// A two-party exchange: the driver sends one prompt, the responder answers once.
///
/// The driver never auto-replies, so every [`ChatSession::send`] is exactly
/// one round trip.
#[derive(Clone)]
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    model: String,
    responder: Responder,
}

impl ChatSession {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        model: impl Into<String>,
        responder: Responder,
    ) -> Self {
        Self {
            transport,
            model: model.into(),
            responder,
        }
    }

    /// Send a prompt and return the responder's final message and its cost.
    ///
    /// Returns `ChatError::NoResponse` when the responder produced no terminal
    /// message (absent or blank content). Cost is zero when the provider
    /// reported no usage or the model has no known price.
    pub async fn send(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        let request = ChatRequest {
            model: self.model.clone(),
            system_message: self.responder.system_message.clone(),
            prompt: prompt.to_string(),
        };

        debug!(
            "Sending {} chars to {} ({})",
            prompt.len(),
            self.responder.name,
            self.model
        );

        let completion = self.transport.complete(&request).await?;

        let content = completion
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(ChatError::NoResponse)?;

        let cost = match completion.usage {
            Some(ref usage) => Cost::from_usage(&self.model, usage).unwrap_or_else(|| {
                debug!("No price known for model {}, reporting zero cost", self.model);
                Cost::ZERO
            }),
            None => Cost::ZERO,
        };

        debug!("{} replied with {} chars ({})", self.responder.name, content.len(), cost);

        Ok(ChatReply { content, cost })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(mock: MockChatTransport, model: &str) -> ChatSession {
        ChatSession::new(
            Arc::new(mock),
            model,
            Responder::new("git_assistant", "analyze diffs"),
        )
    }

    #[tokio::test]
    async fn test_send_passes_system_message_and_prompt() {
        let mut mock = MockChatTransport::new();
        mock.expect_complete()
            .withf(|req| {
                req.model == "gpt-4o"
                    && req.system_message == "analyze diffs"
                    && req.prompt == "hello"
            })
            .times(1)
            .returning(|_| {
                Ok(ChatCompletion {
                    content: Some("hi".to_string()),
                    usage: None,
                })
            });

        let reply = session_with(mock, "gpt-4o").send("hello").await.unwrap();
        assert_eq!(reply.content, "hi");
        assert_eq!(reply.cost, Cost::ZERO);
    }

    #[tokio::test]
    async fn test_send_prices_reported_usage() {
        let mut mock = MockChatTransport::new();
        mock.expect_complete().returning(|_| {
            Ok(ChatCompletion {
                content: Some("reply".to_string()),
                usage: Some(Usage {
                    prompt_tokens: 1_000,
                    completion_tokens: 100,
                    total_tokens: 1_100,
                }),
            })
        });

        let reply = session_with(mock, "gpt-4o").send("p").await.unwrap();
        assert!(reply.cost > Cost::ZERO);
    }

    #[tokio::test]
    async fn test_send_unknown_model_costs_zero() {
        let mut mock = MockChatTransport::new();
        mock.expect_complete().returning(|_| {
            Ok(ChatCompletion {
                content: Some("reply".to_string()),
                usage: Some(Usage {
                    prompt_tokens: 1_000,
                    completion_tokens: 100,
                    total_tokens: 1_100,
                }),
            })
        });

        let reply = session_with(mock, "local-model").send("p").await.unwrap();
        assert_eq!(reply.cost, Cost::ZERO);
    }

    #[tokio::test]
    async fn test_send_absent_content_is_no_response() {
        let mut mock = MockChatTransport::new();
        mock.expect_complete()
            .returning(|_| Ok(ChatCompletion::default()));

        let err = session_with(mock, "gpt-4o").send("p").await.unwrap_err();
        assert!(matches!(err, ChatError::NoResponse));
    }

    #[tokio::test]
    async fn test_send_blank_content_is_no_response() {
        let mut mock = MockChatTransport::new();
        mock.expect_complete().returning(|_| {
            Ok(ChatCompletion {
                content: Some("  \n ".to_string()),
                usage: None,
            })
        });

        let err = session_with(mock, "gpt-4o").send("p").await.unwrap_err();
        assert!(matches!(err, ChatError::NoResponse));
    }

    #[tokio::test]
    async fn test_send_propagates_transport_errors() {
        let mut mock = MockChatTransport::new();
        mock.expect_complete().returning(|_| {
            Err(ChatError::Api {
                status: 401,
                body: "bad key".to_string(),
            })
        });

        let err = session_with(mock, "gpt-4o").send("p").await.unwrap_err();
        assert!(matches!(err, ChatError::Api { status: 401, .. }));
    }
}
