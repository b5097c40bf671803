//! Anthropic Claude `Reasoner`.
//!
//! Implements the [`Reasoner`] port over the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ReasonerError;
use crate::port::outbound::reasoner::Reasoner;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude API client.
#[derive(Debug)]
pub struct Anthropic {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: usize,
}

impl Anthropic {
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Build a client from the `ANTHROPIC_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns [`ReasonerError::MissingCredentials`] if the variable is unset.
    pub fn from_env(model: impl Into<String>) -> Result<Self, ReasonerError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ReasonerError::MissingCredentials("ANTHROPIC_API_KEY"))?;
        Ok(Self::new(api_key, model, 1024))
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[async_trait]
impl Reasoner for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn reason(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: Duration,
    ) -> Result<String, ReasonerError> {
        let request = Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system_prompt.to_string(),
            messages: vec![Message {
                role: "user",
                content: user_prompt.to_string(),
            }],
        };

        let send = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send();

        let response = tokio::time::timeout(deadline, send)
            .await
            .map_err(|_| ReasonerError::Timeout)?
            .map_err(|e| ReasonerError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ReasonerError::Transport(e.to_string()))?;

        let body: Response = tokio::time::timeout(deadline, response.json())
            .await
            .map_err(|_| ReasonerError::Timeout)?
            .map_err(|e| ReasonerError::InvalidJson(e.to_string()))?;

        Ok(body
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_system_prompt() {
        let request = Request {
            model: "claude-sonnet-4-6".to_string(),
            max_tokens: 1024,
            system: "be terse".to_string(),
            messages: vec![Message {
                role: "user",
                content: "hello".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"], "be terse");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn response_joins_multiple_content_blocks() {
        let json = r#"{"content": [{"text": "foo "}, {"text": "bar"}]}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let joined: String = response.content.into_iter().map(|c| c.text).collect();
        assert_eq!(joined, "foo bar");
    }

    #[test]
    fn from_env_missing_key_reports_credentials_error() {
        std::env::remove_var("ANTHROPIC_API_KEY");
        let err = Anthropic::from_env("claude-sonnet-4-6").unwrap_err();
        assert!(matches!(err, ReasonerError::MissingCredentials(_)));
    }

    #[test]
    fn client_name_is_anthropic() {
        let client = Anthropic::new("key", "claude-sonnet-4-6", 1024);
        assert_eq!(client.name(), "anthropic");
    }
}
