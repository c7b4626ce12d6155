//! Prompt construction for suggestion requests.

use super::types::{DifferentiatorRequest, FollowUpRequest};
use crate::core::CustomerType;

/// A system instruction and the user message sent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const BRAND_TONE: &str = "BRAND TONE: Concise. No filler words. Neutral but warm. Directive.";

fn audience(kind: CustomerType) -> &'static str {
    match kind {
        CustomerType::External => "External customers/clients",
        CustomerType::Internal => "Internal operations/tools",
    }
}

/// Prompt for a follow-up question about the user's audience.
pub fn follow_up_prompt(request: &FollowUpRequest) -> Prompt {
    let kind = request.kind();
    let subject = match kind {
        CustomerType::External => "target customers",
        CustomerType::Internal => "internal stakeholders",
    };

    let user = format!(
        r#"Based on this business context:

CUSTOMER TYPE: {audience}
PROBLEM: {problem}
LOCATION: {location}

Generate a follow-up question about their {subject}.

{BRAND_TONE}

Requirements:
1. Title: 3-6 words max like "Who are your users?" or "Which teams benefit?"
2. Description: 1-2 sentences. Direct and clear.
3. Question specific to their context
4. 4 concise example answers

Respond in JSON format:
{{
  "title": "short question (3-6 words)",
  "description": "what we need to understand",
  "suggestions": ["example 1", "example 2", "example 3", "example 4"]
}}"#,
        audience = audience(kind),
        problem = request.problem.trim(),
        location = request.location.trim(),
    );

    Prompt {
        system: "You are a business strategist. Generate insightful follow-up questions. \
                 Be direct and practical."
            .to_string(),
        user,
    }
}

/// Prompt for differentiators, either a full batch or a single new one.
pub fn differentiators_prompt(request: &DifferentiatorRequest) -> Prompt {
    let kind = request.kind();
    let selected = if request.selected_features.is_empty() {
        String::new()
    } else {
        format!("\nALREADY SELECTED DIFFERENTIATORS: {}", request.selected_features.join(", "))
    };

    let novelty = if request.selected_features.is_empty() {
        "Generate core differentiators that solve the problem better than existing solutions"
    } else {
        "Generate NEW differentiators that complement selected ones - avoid duplicates"
    };
    let focus = match kind {
        CustomerType::External => "unique value customers choose over competitors",
        CustomerType::Internal => "operational advantages superior to current processes",
    };
    let (count, shape) = if request.request_single_suggestion {
        ("1 specific competitive advantage", r#"["Differentiator: unique advantage"]"#)
    } else {
        (
            "4 specific competitive advantages",
            r#"["Differentiator 1: unique advantage", "Differentiator 2: unique advantage", "Differentiator 3: unique advantage", "Differentiator 4: unique advantage"]"#,
        )
    };

    let user = format!(
        r#"Based on this business problem:

CUSTOMER TYPE: {audience}
CORE PROBLEM: {problem}{selected}

Generate differentiating features that make this solution stand out.

{BRAND_TONE}

Requirements:
1. Title: 3-6 words max. Try variations like "Key differentiators", "Competitive strengths", "Core advantages", "What sets you apart", "Your edge", or "Unique strengths"
2. Description: 1-2 sentences. What makes this solution unique.
3. {novelty}
4. Focus on {focus}
5. What makes this 10x better, faster, cheaper, or more convenient
6. {count}

Respond in JSON format:
{{
  "title": "short differentiator prompt (3-6 words)",
  "description": "what makes this solution uniquely valuable",
  "suggestions": {shape}
}}"#,
        audience = audience(kind),
        problem = request.problem.trim(),
    );

    Prompt {
        system: "You are a business strategist. Generate concise differentiators that solve real \
                 problems. Be direct. No corporate fluff."
            .to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_prompt_context() {
        let prompt = follow_up_prompt(&FollowUpRequest::new("internal", "Slow payroll", "Canada"));
        assert!(prompt.user.contains("CUSTOMER TYPE: Internal operations/tools"));
        assert!(prompt.user.contains("PROBLEM: Slow payroll"));
        assert!(prompt.user.contains("LOCATION: Canada"));
        assert!(prompt.user.contains("internal stakeholders"));
        assert!(prompt.user.contains(r#""suggestions": ["example 1""#));
    }

    #[test]
    fn test_differentiators_prompt_batch() {
        let prompt = differentiators_prompt(&DifferentiatorRequest::initial("external", "Churn"));
        assert!(!prompt.user.contains("ALREADY SELECTED"));
        assert!(prompt.user.contains("4 specific competitive advantages"));
    }

    #[test]
    fn test_differentiators_prompt_incremental() {
        let request = DifferentiatorRequest::incremental(
            "external",
            "Churn",
            vec!["Fast setup".into(), "Live chat".into()],
        );
        let prompt = differentiators_prompt(&request);
        assert!(prompt.user.contains("ALREADY SELECTED DIFFERENTIATORS: Fast setup, Live chat"));
        assert!(prompt.user.contains("avoid duplicates"));
        assert!(prompt.user.contains("1 specific competitive advantage"));
    }
}
