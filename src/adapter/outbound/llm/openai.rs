//! OpenAI `Reasoner`.
//!
//! Implements the [`Reasoner`] port over the Chat Completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ReasonerError;
use crate::port::outbound::reasoner::Reasoner;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI Chat Completions API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: usize,
}

impl OpenAi {
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Build a client from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns [`ReasonerError::MissingCredentials`] if the variable is unset.
    pub fn from_env(model: impl Into<String>) -> Result<Self, ReasonerError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ReasonerError::MissingCredentials("OPENAI_API_KEY"))?;
        Ok(Self::new(api_key, model, 1024))
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl Reasoner for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
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
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
        };

        let send = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send();

        let response = tokio::time::timeout(deadline, send)
            .await
            .map_err(|_| ReasonerError::Timeout)?
            .map_err(|e| ReasonerError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ReasonerError::Transport(e.to_string()))?;

        let mut body: Response = tokio::time::timeout(deadline, response.json())
            .await
            .map_err(|_| ReasonerError::Timeout)?
            .map_err(|e| ReasonerError::InvalidJson(e.to_string()))?;

        body.choices
            .drain(..)
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ReasonerError::SchemaMismatch("no choices in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_includes_system_message_first() {
        let request = Request {
            model: "gpt-5".to_string(),
            max_tokens: 1024,
            messages: vec![
                Message {
                    role: "system",
                    content: "be terse".to_string(),
                },
                Message {
                    role: "user",
                    content: "hello".to_string(),
                },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn response_extracts_first_choice_content() {
        let json = r#"{"choices": [{"message": {"content": "hi there"}}]}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "hi there");
    }

    #[test]
    fn empty_choices_is_a_schema_mismatch() {
        let response = Response { choices: vec![] };
        let result = response
            .choices
            .into_iter()
            .next()
            .map(|c: Choice| c.message.content)
            .ok_or_else(|| ReasonerError::SchemaMismatch("no choices in response".to_string()));
        assert!(matches!(result, Err(ReasonerError::SchemaMismatch(_))));
    }

    #[test]
    fn from_env_missing_key_reports_credentials_error() {
        std::env::remove_var("OPENAI_API_KEY");
        let err = OpenAi::from_env("gpt-5").unwrap_err();
        assert!(matches!(err, ReasonerError::MissingCredentials(_)));
    }

    #[test]
    fn client_name_is_openai() {
        let client = OpenAi::new("key", "gpt-5", 1024);
        assert_eq!(client.name(), "openai");
    }
}
