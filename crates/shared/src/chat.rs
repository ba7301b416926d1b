//! Client for OpenAI-compatible chat-completion APIs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ChatConfig;

/// Chat client errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No API key configured.
    #[error("chat is not configured")]
    NotConfigured,
    /// The request failed.
    #[error("chat request failed: {0}")]
    Request(String),
    /// The upstream answered with a non-success status.
    #[error("chat upstream returned {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// The upstream answer had no message.
    #[error("chat response contained no reply")]
    EmptyReply,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `system`, `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatTurn {
    /// Creates a turn.
    #[must_use]
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatTurn,
}

/// Chat-completion client.
#[derive(Clone)]
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Creates a chat client whose requests give up after
    /// `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Request` if the HTTP client cannot be built.
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Request(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Returns true when an API key is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// System prompt prepended to conversations.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Sends a conversation and returns the assistant's reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NotConfigured` without a network call when no API
    /// key is set, and a request/upstream error otherwise.
    pub async fn complete(&self, messages: &[ChatTurn]) -> Result<String, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ChatError::NotConfigured)?;

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_fails_fast() {
        let client = ChatClient::new(ChatConfig::default()).unwrap();
        assert!(!client.is_enabled());

        let result = client.complete(&[ChatTurn::new("user", "hi")]).await;
        assert!(matches!(result, Err(ChatError::NotConfigured)));
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let client = ChatClient::new(ChatConfig {
            base_url: "https://llm.example.com/v1/".to_string(),
            ..ChatConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://llm.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatTurn::new("system", "be brief"), ChatTurn::new("user", "hi")];
        let request = CompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            max_tokens: 100,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 100);
    }

    #[test]
    fn test_response_parsing() {
        let body: CompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content, "Hello!");
    }

    #[tokio::test]
    async fn test_unresponsive_upstream_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = ChatClient::new(ChatConfig {
            api_key: Some("key".to_string()),
            base_url: format!("http://{addr}/v1"),
            timeout_secs: 1,
            ..ChatConfig::default()
        })
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.complete(&[ChatTurn::new("user", "hi")]),
        )
        .await
        .expect("complete should give up on its own");
        assert!(matches!(result, Err(ChatError::Request(_))));
        server.abort();
    }
}
