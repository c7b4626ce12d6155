//! Suggestion service.
//!
//! Generates follow-up questions and differentiator suggestions for the
//! wizard using an LLM provider, with hardcoded fallbacks so the wizard stays
//! usable without network access.
//!
//! ## Providers
//!
//! - OpenAI chat completions (`OPENAI_API_KEY`)
//! - Claude messages API (`ANTHROPIC_API_KEY`)
//!
//! Providers are tried in configured order. If every provider fails the
//! service answers from [`fallback`]; callers never see an error.

#[cfg(feature = "ai")]
mod claude;
pub mod fallback;
#[cfg(feature = "ai")]
mod openai;
mod prompt;
mod types;

#[cfg(feature = "ai")]
pub use claude::ClaudeProvider;
#[cfg(feature = "ai")]
pub use openai::OpenAiProvider;
pub use prompt::{differentiators_prompt, follow_up_prompt, Prompt};
pub use types::{
    parse_suggestions, DifferentiatorRequest, FollowUpRequest, Suggestion, Suggestions,
    DEFAULT_FOLLOW_UP_DESCRIPTION,
};

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::AiConfig;

/// Trait for LLM suggestion providers.
///
/// Implementors supply [`SuggestionProvider::complete`]; the request methods
/// build prompts and parse replies on top of it.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Send a system instruction and user message, returning the raw reply.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError>;

    /// Get the provider name.
    fn name(&self) -> &str;

    /// Generate a follow-up question about the audience.
    async fn follow_up(&self, request: &FollowUpRequest) -> Result<Suggestions, AiError> {
        let prompt = follow_up_prompt(request);
        let reply = self.complete(&prompt.system, &prompt.user).await?;
        let mut suggestions = parse_suggestions(&reply)?;
        if suggestions.description.is_empty() {
            suggestions.description = DEFAULT_FOLLOW_UP_DESCRIPTION.to_string();
        }
        Ok(suggestions)
    }

    /// Generate differentiators (a batch, or one when requested).
    async fn differentiators(&self, request: &DifferentiatorRequest) -> Result<Suggestions, AiError> {
        let prompt = differentiators_prompt(request);
        let reply = self.complete(&prompt.system, &prompt.user).await?;
        parse_suggestions(&reply)
    }
}

/// AI error types.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Missing required fields")]
    MissingFields,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("No response from AI")]
    NoResponse,

    #[error("Malformed response: {0}")]
    Parse(String),
}

#[cfg(feature = "ai")]
impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Where a set of suggestions came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "provider")]
pub enum SuggestionSource {
    /// A provider answered
    Provider(String),
    /// Hardcoded fallback
    Fallback,
}

/// Suggestions plus their source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionOutcome {
    #[serde(flatten)]
    pub suggestions: Suggestions,
    pub source: SuggestionSource,
}

impl SuggestionOutcome {
    pub fn is_fallback(&self) -> bool {
        self.source == SuggestionSource::Fallback
    }
}

/// Suggestion service with provider fallback.
///
/// Tries providers in order, then the hardcoded fallback for the request's
/// customer type.
pub struct SuggestionService {
    providers: Vec<Box<dyn SuggestionProvider>>,
    timeout: Duration,
}

impl SuggestionService {
    /// Build the provider chain from configuration.
    pub fn from_config(config: &AiConfig) -> Self {
        let mut providers: Vec<Box<dyn SuggestionProvider>> = Vec::new();

        if config.enabled {
            for name in &config.providers {
                match build_provider(name, config) {
                    Ok(provider) => providers.push(provider),
                    Err(e) => tracing::debug!(provider = %name, error = %e, "Skipping provider"),
                }
            }
        }

        Self { providers, timeout: Duration::from_secs(config.timeout_secs.max(1)) }
    }

    /// A service that always answers from the fallbacks.
    pub fn offline() -> Self {
        Self { providers: Vec::new(), timeout: Duration::from_secs(1) }
    }

    /// Use an explicit provider chain.
    pub fn with_providers(providers: Vec<Box<dyn SuggestionProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Check if any provider is configured.
    pub fn is_available(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Get the first provider name.
    pub fn active_provider(&self) -> Option<&str> {
        self.providers.first().map(|p| p.name())
    }

    /// Follow-up question for the audience step.
    pub async fn follow_up(&self, request: &FollowUpRequest) -> SuggestionOutcome {
        if let Err(e) = request.validate() {
            tracing::warn!(error = %e, "Invalid follow-up request, using fallback");
            return fallback_outcome(fallback::follow_up(request.kind()));
        }

        for provider in &self.providers {
            match tokio::time::timeout(self.timeout, provider.follow_up(request)).await {
                Ok(Ok(suggestions)) => return provider_outcome(provider.as_ref(), suggestions),
                Ok(Err(e)) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                }
                Err(_) => {
                    let e = AiError::Timeout(self.timeout.as_secs());
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                }
            }
        }

        fallback_outcome(fallback::follow_up(request.kind()))
    }

    /// Differentiator suggestions for the key features step.
    pub async fn differentiators(&self, request: &DifferentiatorRequest) -> SuggestionOutcome {
        let kind = request.kind();
        let offline_answer = || {
            if request.request_single_suggestion {
                fallback::incremental(kind)
            } else {
                fallback::differentiators(kind)
            }
        };

        if let Err(e) = request.validate() {
            tracing::warn!(error = %e, "Invalid differentiators request, using fallback");
            return fallback_outcome(offline_answer());
        }

        for provider in &self.providers {
            match tokio::time::timeout(self.timeout, provider.differentiators(request)).await {
                Ok(Ok(suggestions)) => return provider_outcome(provider.as_ref(), suggestions),
                Ok(Err(e)) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                }
                Err(_) => {
                    let e = AiError::Timeout(self.timeout.as_secs());
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                }
            }
        }

        fallback_outcome(offline_answer())
    }
}

impl std::fmt::Debug for SuggestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("SuggestionService")
            .field("providers", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn provider_outcome(provider: &dyn SuggestionProvider, suggestions: Suggestions) -> SuggestionOutcome {
    tracing::debug!(provider = provider.name(), count = suggestions.suggestions.len(), "Suggestions received");
    SuggestionOutcome { suggestions, source: SuggestionSource::Provider(provider.name().to_string()) }
}

fn fallback_outcome(suggestions: Suggestions) -> SuggestionOutcome {
    tracing::debug!("Using fallback suggestions");
    SuggestionOutcome { suggestions, source: SuggestionSource::Fallback }
}

#[cfg(feature = "ai")]
fn build_provider(name: &str, config: &AiConfig) -> Result<Box<dyn SuggestionProvider>, AiError> {
    match name.to_ascii_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::from_config(config)?)),
        "claude" | "anthropic" => Ok(Box::new(ClaudeProvider::from_config(config)?)),
        other => Err(AiError::NotConfigured(format!("unknown provider '{other}'"))),
    }
}

#[cfg(not(feature = "ai"))]
fn build_provider(name: &str, _config: &AiConfig) -> Result<Box<dyn SuggestionProvider>, AiError> {
    Err(AiError::NotConfigured(format!("'{name}' requires the ai feature")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CustomerType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedProvider {
        reply: Result<&'static str, ()>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SuggestionProvider for FixedProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.map(str::to_string).map_err(|()| AiError::Http("connection refused".into()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl SuggestionProvider for SlowProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn service(replies: Vec<Result<&'static str, ()>>) -> (SuggestionService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let providers = replies
            .into_iter()
            .map(|reply| Box::new(FixedProvider { reply, calls: calls.clone() }) as Box<dyn SuggestionProvider>)
            .collect();
        (SuggestionService::with_providers(providers, Duration::from_secs(5)), calls)
    }

    fn follow_up_request() -> FollowUpRequest {
        FollowUpRequest::new("external", "Churn", "Canada")
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let (service, calls) = service(vec![Err(())]);
        let outcome = service.follow_up(&follow_up_request()).await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.suggestions, fallback::follow_up(CustomerType::External));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let (service, _) = service(vec![Ok("I cannot help with that")]);
        let request = DifferentiatorRequest::initial("internal", "Slow payroll");
        let outcome = service.differentiators(&request).await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.suggestions.title, "Core advantages");
    }

    #[tokio::test]
    async fn test_next_provider_tried() {
        let (service, calls) = service(vec![
            Err(()),
            Ok(r#"{"title":"Who buys?","suggestions":["Founders","Agencies"]}"#),
        ]);
        let outcome = service.follow_up(&follow_up_request()).await;

        assert_eq!(outcome.source, SuggestionSource::Provider("fixed".into()));
        assert_eq!(outcome.suggestions.title, "Who buys?");
        assert_eq!(outcome.suggestions.description, DEFAULT_FOLLOW_UP_DESCRIPTION);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_fields_skip_providers() {
        let (service, calls) = service(vec![Ok(r#"{"suggestions":["x"]}"#)]);
        let outcome = service.follow_up(&FollowUpRequest::new("external", "Churn", " ")).await;

        assert!(outcome.is_fallback());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_incremental_fallback_uses_pool() {
        let service = SuggestionService::offline();
        let request = DifferentiatorRequest::incremental("external", "Churn", vec!["Fast".into()]);
        let outcome = service.differentiators(&request).await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.suggestions.suggestions[0].as_str(), "Advanced analytics");
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let service =
            SuggestionService::with_providers(vec![Box::new(SlowProvider)], Duration::from_millis(50));
        let outcome = service.follow_up(&follow_up_request()).await;
        assert!(outcome.is_fallback());
    }

    #[test]
    fn test_disabled_config_has_no_providers() {
        let config = AiConfig { enabled: false, ..AiConfig::default() };
        assert!(!SuggestionService::from_config(&config).is_available());
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = fallback_outcome(fallback::follow_up(CustomerType::Internal));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["title"], "Which teams benefit?");
        assert_eq!(value["source"]["kind"], "fallback");
    }
}
