//! Request and response types for the suggestion service.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::AiError;
use crate::core::CustomerType;

/// Description used when a follow-up response omits one.
pub const DEFAULT_FOLLOW_UP_DESCRIPTION: &str =
    "AI-generated follow-up based on your business context";

/// Request for a follow-up question about the audience.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    pub customer_type: String,
    pub problem: String,
    pub location: String,
}

impl FollowUpRequest {
    pub fn new(
        customer_type: impl Into<String>,
        problem: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self { customer_type: customer_type.into(), problem: problem.into(), location: location.into() }
    }

    /// All three fields are required.
    pub fn validate(&self) -> Result<(), AiError> {
        if [&self.customer_type, &self.problem, &self.location].iter().any(|f| f.trim().is_empty()) {
            return Err(AiError::MissingFields);
        }
        Ok(())
    }

    pub fn kind(&self) -> CustomerType {
        CustomerType::classify(&self.customer_type)
    }
}

/// Request for differentiator suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentiatorRequest {
    pub customer_type: String,
    pub problem: String,
    /// Differentiators the user already picked
    #[serde(default)]
    pub selected_features: Vec<String>,
    /// Ask for one new suggestion instead of a full batch
    #[serde(default)]
    pub request_single_suggestion: bool,
}

impl DifferentiatorRequest {
    /// A full batch for a fresh step.
    pub fn initial(customer_type: impl Into<String>, problem: impl Into<String>) -> Self {
        Self { customer_type: customer_type.into(), problem: problem.into(), ..Self::default() }
    }

    /// One more suggestion complementing `selected`.
    pub fn incremental(
        customer_type: impl Into<String>,
        problem: impl Into<String>,
        selected: Vec<String>,
    ) -> Self {
        Self {
            customer_type: customer_type.into(),
            problem: problem.into(),
            selected_features: selected,
            request_single_suggestion: true,
        }
    }

    /// Customer type and problem are required.
    pub fn validate(&self) -> Result<(), AiError> {
        if self.customer_type.trim().is_empty() || self.problem.trim().is_empty() {
            return Err(AiError::MissingFields);
        }
        Ok(())
    }

    pub fn kind(&self) -> CustomerType {
        CustomerType::classify(&self.customer_type)
    }
}

/// A single suggestion, optionally of the form `"label: elaboration"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suggestion(String);

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `:`, trimmed.
    pub fn label(&self) -> &str {
        self.0.split(':').next().unwrap_or_default().trim()
    }

    /// Text after the first `:`, if any.
    pub fn elaboration(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, rest)| rest.trim()).filter(|rest| !rest.is_empty())
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Suggestion {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// A title, a short description, and ordered suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub title: String,
    pub description: String,
    pub suggestions: Vec<Suggestion>,
}

impl Suggestions {
    pub fn new(title: &str, description: &str, suggestions: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            suggestions: suggestions.iter().map(|s| Suggestion::new(*s)).collect(),
        }
    }
}

// Older responses used `question` for the title
#[derive(Debug, Deserialize)]
struct RawSuggestions {
    title: Option<String>,
    question: Option<String>,
    description: Option<String>,
    suggestions: Option<Vec<String>>,
}

static FENCED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("valid fence regex")
});

/// Parse a model reply into [`Suggestions`].
///
/// Accepts bare JSON, JSON inside a markdown code fence, or JSON embedded in
/// surrounding prose. A reply without any suggestions is an error.
pub fn parse_suggestions(reply: &str) -> Result<Suggestions, AiError> {
    let body = extract_json(reply).ok_or_else(|| AiError::Parse("no JSON object in reply".into()))?;
    let raw: RawSuggestions =
        serde_json::from_str(body).map_err(|e| AiError::Parse(e.to_string()))?;

    let suggestions: Vec<Suggestion> = raw
        .suggestions
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Suggestion)
        .collect();
    if suggestions.is_empty() {
        return Err(AiError::Parse("reply has no suggestions".into()));
    }

    Ok(Suggestions {
        title: raw.title.or(raw.question).unwrap_or_default().trim().to_string(),
        description: raw.description.unwrap_or_default().trim().to_string(),
        suggestions,
    })
}

fn extract_json(reply: &str) -> Option<&str> {
    let reply = reply.trim();
    let inner = FENCED.captures(reply).and_then(|c| c.get(1)).map_or(reply, |m| m.as_str());
    let start = inner.find('{')?;
    let end = inner.rfind('}')?;
    (start < end).then(|| &inner[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_label() {
        let s = Suggestion::new("10x faster processing: Minutes instead of hours");
        assert_eq!(s.label(), "10x faster processing");
        assert_eq!(s.elaboration(), Some("Minutes instead of hours"));

        let plain = Suggestion::new("  Custom workflows ");
        assert_eq!(plain.label(), "Custom workflows");
        assert_eq!(plain.elaboration(), None);
    }

    #[test]
    fn test_parse_bare_json() {
        let reply = r#"{"title":"Your edge","description":"Why you win.","suggestions":["A: a","B"]}"#;
        let parsed = parse_suggestions(reply).unwrap();
        assert_eq!(parsed.title, "Your edge");
        assert_eq!(parsed.suggestions, vec![Suggestion::new("A: a"), Suggestion::new("B")]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "Here you go:\n```json\n{\"title\": \"T\", \"suggestions\": [\"x\"]}\n```\n";
        let parsed = parse_suggestions(reply).unwrap();
        assert_eq!(parsed.title, "T");
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_parse_legacy_question_field() {
        let reply = r#"{"question":"Who buys?","suggestions":["Founders"]}"#;
        assert_eq!(parse_suggestions(reply).unwrap().title, "Who buys?");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse_suggestions("not json"), Err(AiError::Parse(_))));
        assert!(matches!(parse_suggestions(r#"{"title":"T"}"#), Err(AiError::Parse(_))));
        assert!(matches!(parse_suggestions(r#"{"suggestions": 3}"#), Err(AiError::Parse(_))));
    }

    #[test]
    fn test_request_validation() {
        assert!(FollowUpRequest::new("external", "Churn", "").validate().is_err());
        assert!(FollowUpRequest::new("external", "Churn", "Canada").validate().is_ok());
        assert!(DifferentiatorRequest::initial("", "Churn").validate().is_err());
        assert!(DifferentiatorRequest::initial("internal", "Churn").validate().is_ok());
    }

    #[test]
    fn test_request_wire_names() {
        let req = DifferentiatorRequest::incremental("external", "Churn", vec!["Fast".into()]);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["selectedFeatures"][0], "Fast");
        assert_eq!(value["requestSingleSuggestion"], true);
    }
}
