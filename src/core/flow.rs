//! Wizard flow controller.
//!
//! Tracks the active step, collects answers, and recomputes the step list
//! from the answers after every change. Advancing past the last step
//! completes the run and hands the answers to the completion callback.

use std::fmt;

use super::step::{generate_steps, WizardStep};
use super::{AnswerMap, AnswerPayload};

/// Builds the step list from the current answers.
pub type StepGenerator = Box<dyn Fn(&AnswerMap) -> Vec<WizardStep> + Send>;

/// Invoked once, with the full answer map, when the run completes.
pub type CompletionCallback = Box<dyn FnOnce(AnswerMap) + Send>;

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// At the given step index
    Active(usize),
    /// Terminal: the run has been handed off
    Completed,
}

/// Result of an advance or retreat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved from one index to another
    Moved { from: usize, to: usize },
    /// The run completed
    Completed,
    /// Nothing changed
    Ignored,
}

/// Header text for the active step. `None` means show a loading placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHeader {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// Wizard flow controller.
pub struct WizardFlow {
    generator: StepGenerator,
    steps: Vec<WizardStep>,
    answers: AnswerMap,
    index: usize,
    completed: bool,
    on_complete: Option<CompletionCallback>,
    dynamic_title: String,
    dynamic_subtitle: String,
}

impl fmt::Debug for WizardFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardFlow")
            .field("index", &self.index)
            .field("steps", &self.steps.len())
            .field("answers", &self.answers.len())
            .field("completed", &self.completed)
            .finish()
    }
}

impl WizardFlow {
    /// Create a flow with a custom step generator.
    pub fn new(generator: StepGenerator, on_complete: CompletionCallback) -> Self {
        let answers = AnswerMap::new();
        let steps = generator(&answers);

        Self {
            generator,
            steps,
            answers,
            index: 0,
            completed: false,
            on_complete: Some(on_complete),
            dynamic_title: String::new(),
            dynamic_subtitle: String::new(),
        }
    }

    /// Create a flow over the blueprint wizard steps.
    pub fn blueprint(on_complete: CompletionCallback) -> Self {
        Self::new(Box::new(generate_steps), on_complete)
    }

    /// Current state.
    pub fn state(&self) -> FlowState {
        if self.completed {
            FlowState::Completed
        } else {
            FlowState::Active(self.index)
        }
    }

    /// Whether the run has completed.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Index of the active step.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The step list computed from the current answers.
    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The active step, or `None` when not ready (empty or out-of-range list).
    pub fn current_step(&self) -> Option<&WizardStep> {
        if self.completed {
            return None;
        }
        self.steps.get(self.index)
    }

    /// All recorded answers.
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Previously submitted payload for a step, used as redisplay default.
    pub fn prior_answer(&self, step_id: &str) -> Option<&AnswerPayload> {
        self.answers.get(step_id)
    }

    /// Submit the active step's answer.
    pub fn submit(&mut self, payload: AnswerPayload) -> Transition {
        match self.current_step() {
            Some(step) => {
                let id = step.id;
                self.advance(id, payload)
            }
            None => Transition::Ignored,
        }
    }

    /// Record `payload` for `step_id` and move forward.
    ///
    /// The id must name the active step; stale submissions are ignored.
    pub fn advance(&mut self, step_id: &str, payload: AnswerPayload) -> Transition {
        let Some(current) = self.current_step() else {
            return Transition::Ignored;
        };
        if current.id != step_id {
            tracing::warn!(step_id, active = current.id, "Ignoring answer for inactive step");
            return Transition::Ignored;
        }

        self.answers.insert(step_id, payload);
        self.recompute_steps();
        self.clear_dynamic_header();

        if self.index + 1 >= self.steps.len() {
            self.completed = true;
            tracing::debug!(answers = self.answers.len(), "Wizard run completed");
            if let Some(callback) = self.on_complete.take() {
                callback(self.answers.clone());
            }
            return Transition::Completed;
        }

        let from = self.index;
        self.index += 1;
        tracing::debug!(from, to = self.index, step = step_id, "Advanced wizard step");
        Transition::Moved { from, to: self.index }
    }

    /// Go back one step. No-op at the first step or after completion.
    pub fn retreat(&mut self) -> Transition {
        if self.completed || self.index == 0 {
            return Transition::Ignored;
        }

        let from = self.index;
        self.index -= 1;
        self.clear_dynamic_header();
        tracing::debug!(from, to = self.index, "Retreated wizard step");
        Transition::Moved { from, to: self.index }
    }

    /// Publish a title/subtitle for the active step (e.g. from an AI response).
    pub fn set_dynamic_header(&mut self, title: impl Into<String>, subtitle: impl Into<String>) {
        self.dynamic_title = title.into();
        self.dynamic_subtitle = subtitle.into();
    }

    /// Header to display: the dynamic text if set, else the step's static text.
    pub fn header(&self) -> StepHeader {
        let step = self.current_step();
        let pick = |dynamic: &str, fixed: Option<&'static str>| {
            if dynamic.is_empty() {
                fixed.filter(|s| !s.is_empty()).map(str::to_string)
            } else {
                Some(dynamic.to_string())
            }
        };

        StepHeader {
            title: pick(&self.dynamic_title, step.and_then(|s| s.title)),
            subtitle: pick(&self.dynamic_subtitle, step.and_then(|s| s.subtitle)),
        }
    }

    /// Progress as (1-based step, step count, rounded percent).
    pub fn progress(&self) -> (usize, usize, u8) {
        let count = self.steps.len();
        if count == 0 {
            return (0, 0, 0);
        }
        let position = (self.index + 1).min(count);
        let percent = ((position as f64 / count as f64) * 100.0).round() as u8;
        (position, count, percent)
    }

    fn recompute_steps(&mut self) {
        self.steps = (self.generator)(&self.answers);
        if self.index >= self.steps.len() && !self.steps.is_empty() {
            self.index = self.steps.len() - 1;
        }
    }

    fn clear_dynamic_header(&mut self) {
        self.dynamic_title.clear();
        self.dynamic_subtitle.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::step::ids;
    use serde_json::json;
    use std::sync::mpsc;

    fn flow_with_channel() -> (WizardFlow, mpsc::Receiver<AnswerMap>) {
        let (tx, rx) = mpsc::channel();
        let flow = WizardFlow::blueprint(Box::new(move |answers| {
            let _ = tx.send(answers);
        }));
        (flow, rx)
    }

    #[test]
    fn test_initial_state() {
        let (flow, _rx) = flow_with_channel();
        assert_eq!(flow.state(), FlowState::Active(0));
        assert!(flow.answers().is_empty());
        assert_eq!(flow.current_step().map(|s| s.id), Some(ids::CUSTOMER_TYPE));
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let (mut flow, _rx) = flow_with_channel();
        assert_eq!(flow.retreat(), Transition::Ignored);
        assert_eq!(flow.current_index(), 0);
        assert!(flow.answers().is_empty());
    }

    #[test]
    fn test_advance_records_answer() {
        let (mut flow, _rx) = flow_with_channel();
        let t = flow.advance(ids::CUSTOMER_TYPE, json!({ "customerType": "external" }));
        assert_eq!(t, Transition::Moved { from: 0, to: 1 });
        assert_eq!(flow.answers().customer_type(), "external");
    }

    #[test]
    fn test_stale_step_id_ignored() {
        let (mut flow, _rx) = flow_with_channel();
        let t = flow.advance(ids::LOCATION, json!({ "location": "Canada" }));
        assert_eq!(t, Transition::Ignored);
        assert!(flow.answers().is_empty());
    }

    #[test]
    fn test_retreat_keeps_answers_ahead() {
        let (mut flow, _rx) = flow_with_channel();
        flow.submit(json!({ "customerType": "external" }));
        flow.submit(json!({ "problem": "Churn" }));
        flow.retreat();
        flow.retreat();

        assert_eq!(flow.current_index(), 0);
        assert!(flow.prior_answer(ids::CORE_PROBLEM).is_some());
        assert_eq!(flow.answers().len(), 2);
    }

    #[test]
    fn test_steps_recomputed_from_answers() {
        let (mut flow, _rx) = flow_with_channel();
        flow.submit(json!({ "customerType": "internal" }));
        assert_eq!(flow.steps()[3].context.customer_type, "internal");

        flow.retreat();
        flow.submit(json!({ "customerType": "external" }));
        assert_eq!(flow.steps()[3].context.customer_type, "external");
    }

    #[test]
    fn test_dynamic_header_resets_on_move() {
        let (mut flow, _rx) = flow_with_channel();
        flow.submit(json!({ "customerType": "external" }));
        flow.submit(json!({ "problem": "Churn" }));
        flow.submit(json!({ "location": "Canada" }));

        // customerFocus has no static title
        assert_eq!(flow.header().title, None);
        flow.set_dynamic_header("Who are your users?", "Tell us more");
        assert_eq!(flow.header().title.as_deref(), Some("Who are your users?"));

        flow.retreat();
        assert_eq!(flow.header().title.as_deref(), Some("Where will you operate?"));

        flow.submit(json!({ "location": "Canada" }));
        assert_eq!(flow.header().title, None);
        assert_eq!(flow.header().subtitle, None);
    }

    #[test]
    fn test_completion_invoked_once() {
        let (mut flow, rx) = flow_with_channel();
        flow.submit(json!({ "customerType": "external" }));
        flow.submit(json!({ "problem": "Churn" }));
        flow.submit(json!({ "location": "Canada" }));
        flow.submit(json!({ "customerFocus": "Founders" }));
        flow.submit(json!({ "keyFeatures": ["Fast"] }));
        let t = flow.submit(json!({ "reviewed": true, "readyForGeneration": true }));

        assert_eq!(t, Transition::Completed);
        assert_eq!(flow.state(), FlowState::Completed);

        let answers = rx.try_recv().unwrap();
        let keys: Vec<_> = answers.keys().map(str::to_string).collect();
        let mut expected: Vec<_> = flow.steps().iter().map(|s| s.id.to_string()).collect();
        expected.sort();
        assert_eq!(keys, expected);

        // Terminal state is one-way
        assert_eq!(flow.submit(json!({})), Transition::Ignored);
        assert_eq!(flow.retreat(), Transition::Ignored);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_generator_is_not_ready() {
        let flow = WizardFlow::new(Box::new(|_| Vec::new()), Box::new(|_| {}));
        assert!(flow.current_step().is_none());
        assert_eq!(flow.progress(), (0, 0, 0));
    }

    #[test]
    fn test_progress() {
        let (mut flow, _rx) = flow_with_channel();
        assert_eq!(flow.progress(), (1, 6, 17));
        flow.submit(json!({ "customerType": "external" }));
        assert_eq!(flow.progress(), (2, 6, 33));
    }
}
