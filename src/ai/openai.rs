//! OpenAI API integration.
//!
//! Implements the SuggestionProvider trait over the chat completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiError, SuggestionProvider};
use crate::core::AiConfig;

/// OpenAI chat completions provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a provider from configuration.
    ///
    /// Reads the API key from the OPENAI_API_KEY environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Use a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl SuggestionProvider for OpenAiProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system.to_string() },
                ChatMessage { role: "user".to_string(), content: user.to_string() },
            ],
            max_tokens: Some(400),
            temperature: Some(0.7),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body });
        }

        let response: OpenAiResponse = response.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::NoResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}
