//! Claude API integration.
//!
//! Implements the SuggestionProvider trait for Claude.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiError, SuggestionProvider};
use crate::core::AiConfig;

/// Claude API provider.
pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    /// Create a provider from configuration.
    ///
    /// Reads API key from ANTHROPIC_API_KEY environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        Ok(Self { client: Client::new(), api_key, model: config.claude_model.clone() })
    }
}

#[async_trait]
impl SuggestionProvider for ClaudeProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError> {
        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: 400,
            system: system.to_string(),
            messages: vec![Message { role: "user".to_string(), content: user.to_string() }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body });
        }

        let response: ClaudeResponse = response.json().await?;

        response.content.into_iter().next().map(|c| c.text).ok_or(AiError::NoResponse)
    }

    fn name(&self) -> &str {
        "claude"
    }
}

/// Claude API request structure.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

/// Message in a Claude request.
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Claude API response structure.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a Claude response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_claude_provider_creation_fails_without_key() {
        std::env::remove_var("ANTHROPIC_API_KEY");
        let result = ClaudeProvider::from_config(&AiConfig::default());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_claude_provider_model_from_config() {
        std::env::set_var("ANTHROPIC_API_KEY", "test-key");
        let config = AiConfig { claude_model: "claude-test".into(), ..AiConfig::default() };
        let provider = ClaudeProvider::from_config(&config).unwrap();
        std::env::remove_var("ANTHROPIC_API_KEY");

        assert_eq!(provider.model, "claude-test");
    }
}
