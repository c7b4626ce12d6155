//! Wizard step forms.
//!
//! Each step kind has a form that collects its answer. [`StepForm`] wraps
//! them so the app can mount whichever step is active, feed it input, and
//! hand it suggestion results.

mod dispatch;
mod forms;
mod suggest;

pub use dispatch::{FetchKind, SuggestionDispatcher, SuggestionEvent, SuggestionRequest, Ticket};
pub use forms::{CustomerTypeForm, LocationForm, ProblemForm, ReviewForm, TextInput, LOCATIONS};
pub use suggest::{
    FeatureFetch, FeaturesForm, FetchGate, FocusForm, HeaderUpdate, INITIAL_SUGGESTIONS,
    MAX_SUGGESTIONS,
};

use crate::ai::SuggestionOutcome;
use crate::core::{AnswerPayload, StepKind, WizardStep};

/// The form for the active step.
#[derive(Debug, Clone)]
pub enum StepForm {
    CustomerType(CustomerTypeForm),
    CoreProblem(ProblemForm),
    Location(LocationForm),
    CustomerFocus(FocusForm),
    KeyFeatures(FeaturesForm),
    Review(ReviewForm),
}

impl StepForm {
    /// Build a fresh form for `step`, seeded from its previous answer.
    pub fn mount(step: &WizardStep, prior: Option<&AnswerPayload>) -> Self {
        match step.kind {
            StepKind::CustomerType => Self::CustomerType(CustomerTypeForm::new(prior)),
            StepKind::CoreProblem => Self::CoreProblem(ProblemForm::new(prior)),
            StepKind::Location => Self::Location(LocationForm::new(prior)),
            StepKind::CustomerFocus => Self::CustomerFocus(FocusForm::new(step.context.clone(), prior)),
            StepKind::KeyFeatures => Self::KeyFeatures(FeaturesForm::new(step.context.clone(), prior)),
            StepKind::Review => Self::Review(ReviewForm::new(step.context.answers.as_ref())),
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Self::CustomerType(_) => StepKind::CustomerType,
            Self::CoreProblem(_) => StepKind::CoreProblem,
            Self::Location(_) => StepKind::Location,
            Self::CustomerFocus(_) => StepKind::CustomerFocus,
            Self::KeyFeatures(_) => StepKind::KeyFeatures,
            Self::Review(_) => StepKind::Review,
        }
    }

    /// Whether the form holds a submittable answer.
    pub fn can_advance(&self) -> bool {
        match self {
            Self::CustomerType(form) => form.can_advance(),
            Self::CoreProblem(form) => form.can_advance(),
            Self::Location(form) => form.can_advance(),
            Self::CustomerFocus(form) => form.can_advance(),
            Self::KeyFeatures(form) => form.can_advance(),
            Self::Review(form) => form.can_advance(),
        }
    }

    /// The answer to submit, if the form allows advancing.
    pub fn payload(&self) -> Option<AnswerPayload> {
        match self {
            Self::CustomerType(form) => form.payload(),
            Self::CoreProblem(form) => form.payload(),
            Self::Location(form) => form.payload(),
            Self::CustomerFocus(form) => form.payload(),
            Self::KeyFeatures(form) => form.payload(),
            Self::Review(form) => form.payload(),
        }
    }

    /// The request to issue on mount, for forms that fetch suggestions.
    pub fn start(&mut self) -> Option<(FetchKind, SuggestionRequest)> {
        match self {
            Self::CustomerFocus(form) => {
                form.start().map(|req| (FetchKind::FollowUp, SuggestionRequest::FollowUp(req)))
            }
            Self::KeyFeatures(form) => form.start().map(|req| {
                (FetchKind::Differentiators(FeatureFetch::Batch), SuggestionRequest::Differentiators(req))
            }),
            _ => None,
        }
    }

    /// Hand a settled request to the form. Mismatched kinds are dropped.
    pub fn apply(&mut self, kind: FetchKind, outcome: SuggestionOutcome) -> Option<HeaderUpdate> {
        match (self, kind) {
            (Self::CustomerFocus(form), FetchKind::FollowUp) => form.apply(outcome),
            (Self::KeyFeatures(form), FetchKind::Differentiators(fetch)) => form.apply(fetch, outcome),
            (form, kind) => {
                tracing::debug!(form = ?form.kind(), ?kind, "Dropping suggestion for other form");
                None
            }
        }
    }

    /// Whether the form is waiting on a suggestion request.
    pub fn is_loading(&self) -> bool {
        match self {
            Self::CustomerFocus(form) => form.loading,
            Self::KeyFeatures(form) => form.loading,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{fallback, SuggestionSource};
    use crate::core::{generate_steps, ids, AnswerMap, CustomerType};
    use serde_json::json;

    fn step(id: &str, answers: &AnswerMap) -> WizardStep {
        generate_steps(answers).into_iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn test_mount_matches_step_kind() {
        let answers = AnswerMap::new();
        for step in generate_steps(&answers) {
            let form = StepForm::mount(&step, None);
            assert_eq!(form.kind(), step.kind);
        }
    }

    #[test]
    fn test_static_forms_do_not_fetch() {
        let mut form = StepForm::mount(&step(ids::CORE_PROBLEM, &AnswerMap::new()), None);
        assert!(form.start().is_none());
        assert!(!form.is_loading());
    }

    #[test]
    fn test_focus_form_issues_follow_up() {
        let mut answers = AnswerMap::new();
        answers.insert(ids::CUSTOMER_TYPE, json!({ "customerType": "internal" }));
        answers.insert(ids::CORE_PROBLEM, json!({ "problem": "Slow payroll" }));
        answers.insert(ids::LOCATION, json!({ "location": "Canada", "customLocation": "" }));

        let mut form = StepForm::mount(&step(ids::CUSTOMER_FOCUS, &answers), None);
        let (kind, request) = form.start().unwrap();
        assert_eq!(kind, FetchKind::FollowUp);
        match request {
            SuggestionRequest::FollowUp(req) => {
                assert_eq!(req.customer_type, "internal");
                assert_eq!(req.location, "Canada");
            }
            other => panic!("unexpected request: {other:?}"),
        }
        assert!(form.is_loading());
    }

    #[test]
    fn test_apply_wrong_kind_is_dropped() {
        let mut form = StepForm::mount(&step(ids::KEY_FEATURES, &AnswerMap::new()), None);
        form.start();
        let outcome = SuggestionOutcome {
            suggestions: fallback::follow_up(CustomerType::External),
            source: SuggestionSource::Fallback,
        };
        assert!(form.apply(FetchKind::FollowUp, outcome).is_none());
        assert!(form.is_loading());
    }

    #[test]
    fn test_review_payload() {
        let form = StepForm::mount(&step(ids::REVIEW, &AnswerMap::new()), None);
        assert!(form.can_advance());
        assert_eq!(form.payload(), Some(json!({ "reviewed": true, "readyForGeneration": true })));
    }
}
