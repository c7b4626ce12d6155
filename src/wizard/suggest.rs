//! Forms backed by the suggestion service.
//!
//! Each form owns a [`FetchGate`]: a request is only issued when the gate is
//! open, and the gate closes again when the result (or fallback) arrives.
//! A trigger while a request is outstanding is dropped.

use serde_json::json;

use super::forms::TextInput;
use crate::ai::{DifferentiatorRequest, FollowUpRequest, Suggestion, SuggestionOutcome};
use crate::core::{AnswerPayload, StepContext};

/// Most suggestions shown on the first differentiator batch.
pub const INITIAL_SUGGESTIONS: usize = 4;

/// Cap on the differentiator suggestion list.
pub const MAX_SUGGESTIONS: usize = 5;

/// Single-flight guard for suggestion requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchGate {
    in_flight: bool,
}

impl FetchGate {
    /// Claim the gate. Returns false if a request is already outstanding.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Release the gate once a request settles.
    pub fn settle(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

/// Header text a form wants published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderUpdate {
    pub title: String,
    pub subtitle: String,
}

impl HeaderUpdate {
    fn from_outcome(outcome: &SuggestionOutcome) -> Option<Self> {
        let title = outcome.suggestions.title.trim();
        (!title.is_empty()).then(|| Self {
            title: title.to_string(),
            subtitle: outcome.suggestions.description.trim().to_string(),
        })
    }
}

/// Audience follow-up: an AI question with example answers.
#[derive(Debug, Clone)]
pub struct FocusForm {
    pub context: StepContext,
    pub input: TextInput,
    pub suggestions: Vec<Suggestion>,
    pub highlighted: usize,
    pub loading: bool,
    loaded: bool,
    gate: FetchGate,
}

impl FocusForm {
    pub fn new(context: StepContext, prior: Option<&AnswerPayload>) -> Self {
        let text =
            prior.and_then(|p| p.get("customerFocus")).and_then(|v| v.as_str()).unwrap_or_default();
        Self {
            context,
            input: TextInput::new(text),
            suggestions: Vec::new(),
            highlighted: 0,
            loading: true,
            loaded: false,
            gate: FetchGate::default(),
        }
    }

    /// Request the follow-up question, once per mount.
    pub fn start(&mut self) -> Option<FollowUpRequest> {
        if self.loaded || !self.gate.try_begin() {
            return None;
        }
        self.loading = true;
        Some(FollowUpRequest::new(
            self.context.customer_type.clone(),
            self.context.problem.clone(),
            self.context.location.clone(),
        ))
    }

    /// Take the service's answer.
    pub fn apply(&mut self, outcome: SuggestionOutcome) -> Option<HeaderUpdate> {
        self.gate.settle();
        self.loading = false;
        self.loaded = true;
        let header = HeaderUpdate::from_outcome(&outcome);
        self.suggestions = outcome.suggestions.suggestions;
        self.highlighted = 0;
        header
    }

    pub fn is_fetching(&self) -> bool {
        self.gate.is_in_flight()
    }

    pub fn select_next(&mut self) {
        if !self.suggestions.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.suggestions.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.suggestions.is_empty() {
            self.highlighted = self.highlighted.checked_sub(1).unwrap_or(self.suggestions.len() - 1);
        }
    }

    /// Fill the answer with the highlighted suggestion.
    pub fn pick_highlighted(&mut self) {
        if let Some(suggestion) = self.suggestions.get(self.highlighted) {
            self.input.set(suggestion.as_str());
        }
    }

    pub fn can_advance(&self) -> bool {
        !self.input.is_blank()
    }

    pub fn payload(&self) -> Option<AnswerPayload> {
        self.can_advance().then(|| json!({ "customerFocus": self.input.value().trim() }))
    }
}

/// Which kind of differentiator request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFetch {
    /// First full batch
    Batch,
    /// One more suggestion after a pick
    Incremental,
}

/// Key differentiators: pick suggestions or add your own.
#[derive(Debug, Clone)]
pub struct FeaturesForm {
    pub context: StepContext,
    pub selected: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub highlighted: usize,
    pub custom: TextInput,
    /// First batch not yet received
    pub loading: bool,
    /// Incremental request outstanding
    pub loading_more: bool,
    loaded: bool,
    gate: FetchGate,
}

impl FeaturesForm {
    pub fn new(context: StepContext, prior: Option<&AnswerPayload>) -> Self {
        let selected = prior
            .and_then(|p| p.get("keyFeatures"))
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            context,
            selected,
            suggestions: Vec::new(),
            highlighted: 0,
            custom: TextInput::default(),
            loading: true,
            loading_more: false,
            loaded: false,
            gate: FetchGate::default(),
        }
    }

    /// Request the first batch, once per mount.
    pub fn start(&mut self) -> Option<DifferentiatorRequest> {
        if self.loaded || !self.gate.try_begin() {
            return None;
        }
        self.loading = true;
        Some(DifferentiatorRequest::initial(
            self.context.customer_type.clone(),
            self.context.problem.clone(),
        ))
    }

    /// Take the service's answer. Only the first batch publishes a header.
    pub fn apply(&mut self, fetch: FeatureFetch, outcome: SuggestionOutcome) -> Option<HeaderUpdate> {
        self.gate.settle();
        match fetch {
            FeatureFetch::Batch => {
                self.loading = false;
                self.loaded = true;
                let header = HeaderUpdate::from_outcome(&outcome);
                self.suggestions =
                    outcome.suggestions.suggestions.into_iter().take(INITIAL_SUGGESTIONS).collect();
                self.highlighted = 0;
                header
            }
            FeatureFetch::Incremental => {
                self.loading_more = false;
                if outcome.is_fallback() {
                    // One unused entry from the pool
                    let next = outcome
                        .suggestions
                        .suggestions
                        .into_iter()
                        .find(|s| !self.suggestions.contains(s) && !self.is_selected(s.label()));
                    self.suggestions.extend(next);
                } else {
                    self.suggestions.extend(outcome.suggestions.suggestions);
                }
                self.suggestions.truncate(MAX_SUGGESTIONS);
                None
            }
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.gate.is_in_flight()
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.selected.iter().any(|s| s == label)
    }

    pub fn select_next(&mut self) {
        if !self.suggestions.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.suggestions.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.suggestions.is_empty() {
            self.highlighted = self.highlighted.checked_sub(1).unwrap_or(self.suggestions.len() - 1);
        }
    }

    /// Pick the highlighted suggestion.
    pub fn pick_highlighted(&mut self) -> Option<DifferentiatorRequest> {
        self.pick(self.highlighted)
    }

    /// Add the suggestion's label to the selection and drop it from the list.
    ///
    /// Returns an incremental request when the list has room for more.
    pub fn pick(&mut self, index: usize) -> Option<DifferentiatorRequest> {
        let label = self.suggestions.get(index)?.label().to_string();
        if label.is_empty() || self.is_selected(&label) {
            return None;
        }

        self.selected.push(label);
        self.suggestions.remove(index);
        if self.highlighted >= self.suggestions.len() {
            self.highlighted = self.suggestions.len().saturating_sub(1);
        }
        self.request_more()
    }

    /// Add the custom text as a differentiator.
    pub fn add_custom(&mut self) -> Option<DifferentiatorRequest> {
        let text = self.custom.value().trim().to_string();
        if text.is_empty() || self.is_selected(&text) {
            return None;
        }

        self.selected.push(text);
        self.custom.clear();
        self.request_more()
    }

    /// Remove a selected differentiator.
    pub fn remove(&mut self, index: usize) {
        if index < self.selected.len() {
            self.selected.remove(index);
        }
    }

    /// Remove the most recently selected differentiator.
    pub fn remove_last(&mut self) {
        self.selected.pop();
    }

    pub fn can_advance(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn payload(&self) -> Option<AnswerPayload> {
        self.can_advance().then(|| json!({ "keyFeatures": self.selected }))
    }

    fn request_more(&mut self) -> Option<DifferentiatorRequest> {
        if self.suggestions.len() >= MAX_SUGGESTIONS || !self.gate.try_begin() {
            return None;
        }
        self.loading_more = true;
        Some(DifferentiatorRequest::incremental(
            self.context.customer_type.clone(),
            self.context.problem.clone(),
            self.selected.clone(),
        ))
    }
}
