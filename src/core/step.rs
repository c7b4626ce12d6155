//! Wizard step definitions.
//!
//! The step list is derived state: [`generate_steps`] rebuilds it from the
//! current answers every time they change.

use serde::Serialize;

use super::AnswerMap;

/// Stable step identifiers.
pub mod ids {
    pub const CUSTOMER_TYPE: &str = "customerType";
    pub const CORE_PROBLEM: &str = "coreProblem";
    pub const LOCATION: &str = "location";
    pub const CUSTOMER_FOCUS: &str = "customerFocus";
    pub const KEY_FEATURES: &str = "keyFeatures";
    pub const REVIEW: &str = "review";
}

/// Which handler renders and collects a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StepKind {
    /// External vs internal choice
    CustomerType,
    /// Free-text problem statement
    CoreProblem,
    /// Operating location
    Location,
    /// AI follow-up question about the audience
    CustomerFocus,
    /// AI-assisted differentiator picker
    KeyFeatures,
    /// Summary and submit
    Review,
}

/// Extra context threaded into a step, drawn from earlier answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepContext {
    pub customer_type: String,
    pub problem: String,
    pub location: String,
    /// The whole answer map (review step only)
    #[serde(skip)]
    pub answers: Option<AnswerMap>,
}

/// A single step of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardStep {
    /// Unique identifier within a run
    pub id: &'static str,
    /// Static title (None when the step publishes its own)
    pub title: Option<&'static str>,
    /// Static subtitle
    pub subtitle: Option<&'static str>,
    /// Handler for this step
    pub kind: StepKind,
    /// Context from previous answers
    pub context: StepContext,
}

impl WizardStep {
    fn fixed(
        id: &'static str,
        title: &'static str,
        subtitle: &'static str,
        kind: StepKind,
    ) -> Self {
        Self { id, title: Some(title), subtitle: Some(subtitle), kind, context: StepContext::default() }
    }

    fn dynamic(id: &'static str, kind: StepKind, context: StepContext) -> Self {
        Self { id, title: None, subtitle: None, kind, context }
    }
}

/// Build the step list for the given answers.
///
/// Fixed prefix (customer type, core problem, location), then the AI-driven
/// steps configured from whatever answers exist so far, then review.
pub fn generate_steps(answers: &AnswerMap) -> Vec<WizardStep> {
    let customer_type = answers.customer_type().to_string();
    let problem = answers.problem().to_string();
    let location = answers.location().to_string();

    vec![
        WizardStep::fixed(
            ids::CUSTOMER_TYPE,
            "Who are you building this for?",
            "Understanding your target audience helps us create a more relevant blueprint",
            StepKind::CustomerType,
        ),
        WizardStep::fixed(
            ids::CORE_PROBLEM,
            "What problem are you solving?",
            "Describe the main challenge or opportunity you're addressing",
            StepKind::CoreProblem,
        ),
        WizardStep::fixed(
            ids::LOCATION,
            "Where will you operate?",
            "This helps us understand regulatory requirements and market conditions",
            StepKind::Location,
        ),
        WizardStep::dynamic(
            ids::CUSTOMER_FOCUS,
            StepKind::CustomerFocus,
            StepContext {
                customer_type: customer_type.clone(),
                problem: problem.clone(),
                location,
                answers: None,
            },
        ),
        WizardStep::dynamic(
            ids::KEY_FEATURES,
            StepKind::KeyFeatures,
            StepContext { customer_type, problem, location: String::new(), answers: None },
        ),
        WizardStep {
            context: StepContext { answers: Some(answers.clone()), ..StepContext::default() },
            ..WizardStep::fixed(
                ids::REVIEW,
                "Review & Generate Blueprint",
                "Confirm your information and create your comprehensive business blueprint",
                StepKind::Review,
            )
        },
    ]
}
