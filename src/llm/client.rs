//! Async classifier client
//!
//! Talks to either an OpenAI-compatible chat endpoint or the Anthropic
//! messages endpoint, picked from the URL. The model only labels the
//! request and extracts hints; nothing it computes reaches the child
//! without going through `reconcile`.

use crate::core::config::LlmConfig;
use crate::core::error::{BotError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::LlmError(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            api_format: Self::detect_api_format(&config.api_url),
        })
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client using LLM_API_KEY from the environment
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| BotError::LlmError("LLM_API_KEY not set".into()))?;

        Self::new(api_key, config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a completion request to the LLM
    ///
    /// # Arguments
    /// * `system` - System messages (instructions, then reference data)
    /// * `user` - The child's utterance
    ///
    /// # Returns
    /// The LLM's raw reply, expected to be a JSON object
    pub async fn complete(&self, system: &[String], user: &str) -> Result<String> {
        tracing::debug!(model = %self.model, format = ?self.api_format, "Calling classifier");

        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
        }
    }

    async fn complete_anthropic(&self, system: &[String], user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system.join("\n\n"),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let completion: AnthropicResponse = self
            .post(&request, |req| {
                req.header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01")
            })
            .await?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| BotError::LlmError("Empty response".into()))
    }

    async fn complete_openai(&self, system: &[String], user: &str) -> Result<String> {
        let mut messages: Vec<Message> = system
            .iter()
            .map(|content| Message {
                role: "system".into(),
                content: content.clone(),
            })
            .collect();
        messages.push(Message {
            role: "user".into(),
            content: user.into(),
        });

        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object".into(),
            },
            messages,
        };

        let completion: OpenAIResponse = self
            .post(&request, |req| req.bearer_auth(&self.api_key))
            .await?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| BotError::LlmError("Empty response".into()))
    }

    /// POST a JSON body and decode the JSON reply, mapping every failure to `LlmError`
    async fn post<B, R>(
        &self,
        body: &B,
        auth: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let response = auth(self.client.post(&self.api_url))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BotError::LlmError(format!("API error {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| BotError::LlmError(format!("Unreadable reply: {}", e)))
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    response_format: ResponseFormat,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
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

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = LlmConfig {
            api_url: "https://api.example.com".into(),
            model: "test-model".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new("test-key".into(), &config).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, "https://api.example.com");
        assert_eq!(client.model(), "test-model");
        assert_eq!(client.api_format, ApiFormat::OpenAI);
    }

    #[test]
    fn test_detect_anthropic() {
        assert_eq!(
            LlmClient::detect_api_format("https://api.anthropic.com/v1/messages"),
            ApiFormat::Anthropic
        );
    }

    #[test]
    fn test_openai_request_shape() {
        let request = OpenAIRequest {
            model: "gpt-4o".into(),
            max_tokens: 100,
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object".into(),
            },
            messages: vec![Message {
                role: "user".into(),
                content: "count to ten".into(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_temperature_is_sent_unwidened() {
        let client = LlmClient::new("test-key".into(), &LlmConfig::default()).unwrap();
        let request = AnthropicRequest {
            model: client.model.clone(),
            max_tokens: client.max_tokens,
            temperature: client.temperature,
            system: String::new(),
            messages: Vec::new(),
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"temperature\":0.2,"), "{}", body);
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = LlmClient::from_env(&LlmConfig::default());
        // Should fail if LLM_API_KEY is not set
        if std::env::var("LLM_API_KEY").is_err() {
            assert!(result.is_err());
        }
    }
}
