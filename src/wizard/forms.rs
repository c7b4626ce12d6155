//! Forms for the fixed wizard steps.

use serde_json::json;

use crate::core::{ids, AnswerMap, AnswerPayload, CustomerType};

/// Locations offered by the location step.
pub const LOCATIONS: [&str; 8] = [
    "United States",
    "Indonesia",
    "Singapore",
    "United Kingdom",
    "Canada",
    "Australia",
    "Global/Remote",
    "Other",
];

const OTHER: &str = "Other";

/// Single-line text input with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_at(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    /// Replace the whole value, cursor at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn byte_at(&self, offset: usize) -> usize {
        self.value.char_indices().nth(offset).map_or(self.value.len(), |(i, _)| i)
    }
}

/// External vs internal choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerTypeForm {
    pub highlighted: usize,
    pub selected: Option<CustomerType>,
}

impl CustomerTypeForm {
    pub fn new(prior: Option<&AnswerPayload>) -> Self {
        let selected = prior
            .and_then(|p| p.get("customerType"))
            .and_then(|v| v.as_str())
            .and_then(CustomerType::parse);
        let highlighted =
            selected.and_then(|s| CustomerType::ALL.iter().position(|t| *t == s)).unwrap_or(0);
        Self { highlighted, selected }
    }

    pub fn select_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % CustomerType::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.select_next();
    }

    /// Choose the highlighted option.
    pub fn choose(&mut self) {
        self.selected = Some(CustomerType::ALL[self.highlighted]);
    }

    pub fn can_advance(&self) -> bool {
        self.selected.is_some()
    }

    pub fn payload(&self) -> Option<AnswerPayload> {
        self.selected.map(|t| json!({ "customerType": t.as_str() }))
    }
}

/// Free-text problem statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemForm {
    pub input: TextInput,
}

impl ProblemForm {
    pub fn new(prior: Option<&AnswerPayload>) -> Self {
        let text = prior.and_then(|p| p.get("problem")).and_then(|v| v.as_str()).unwrap_or_default();
        Self { input: TextInput::new(text) }
    }

    pub fn can_advance(&self) -> bool {
        !self.input.is_blank()
    }

    pub fn payload(&self) -> Option<AnswerPayload> {
        self.can_advance().then(|| json!({ "problem": self.input.value().trim() }))
    }
}

/// Operating location, with a custom value for "Other".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationForm {
    pub highlighted: usize,
    pub selected: Option<usize>,
    pub custom: TextInput,
}

impl LocationForm {
    pub fn new(prior: Option<&AnswerPayload>) -> Self {
        let field = |name: &str| {
            prior.and_then(|p| p.get(name)).and_then(|v| v.as_str()).unwrap_or_default().to_string()
        };
        let location = field("location");
        let custom = field("customLocation");

        let selected = if !custom.is_empty() {
            LOCATIONS.iter().position(|l| *l == OTHER)
        } else if location.is_empty() {
            None
        } else {
            LOCATIONS.iter().position(|l| *l == location).or_else(|| LOCATIONS.iter().position(|l| *l == OTHER))
        };
        let custom = if selected.is_some_and(|i| LOCATIONS[i] == OTHER) && custom.is_empty() {
            location
        } else {
            custom
        };

        Self { highlighted: selected.unwrap_or(0), selected, custom: TextInput::new(custom) }
    }

    pub fn select_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % LOCATIONS.len();
    }

    pub fn select_prev(&mut self) {
        self.highlighted = self.highlighted.checked_sub(1).unwrap_or(LOCATIONS.len() - 1);
    }

    pub fn choose(&mut self) {
        self.selected = Some(self.highlighted);
    }

    /// Whether "Other" is chosen and the custom field takes input.
    pub fn is_other(&self) -> bool {
        self.selected.is_some_and(|i| LOCATIONS[i] == OTHER)
    }

    pub fn can_advance(&self) -> bool {
        match self.selected {
            Some(_) if self.is_other() => !self.custom.is_blank(),
            Some(_) => true,
            None => false,
        }
    }

    /// The location that will be submitted.
    pub fn final_location(&self) -> Option<String> {
        let index = self.selected?;
        if self.is_other() {
            Some(self.custom.value().trim().to_string())
        } else {
            Some(LOCATIONS[index].to_string())
        }
    }

    pub fn payload(&self) -> Option<AnswerPayload> {
        if !self.can_advance() {
            return None;
        }
        let custom = if self.is_other() { self.custom.value().trim() } else { "" };
        self.final_location().map(|location| json!({ "location": location, "customLocation": custom }))
    }
}

/// Summary of everything collected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    pub answers: AnswerMap,
}

impl ReviewForm {
    pub fn new(answers: Option<&AnswerMap>) -> Self {
        Self { answers: answers.cloned().unwrap_or_default() }
    }

    /// Label/value lines shown on the review screen.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let customer_type = self.answers.customer_type();
        let audience = if customer_type.is_empty() {
            String::new()
        } else {
            CustomerType::classify(customer_type).title().to_string()
        };

        vec![
            ("Customer Type", audience),
            ("Core Problem", self.answers.problem().to_string()),
            ("Location", self.answers.location().to_string()),
            ("Customer Focus", self.answers.customer_focus().to_string()),
            ("Key Differentiators", self.answers.key_features().join(", ")),
        ]
    }

    pub fn can_advance(&self) -> bool {
        true
    }

    pub fn payload(&self) -> Option<AnswerPayload> {
        Some(json!({ "reviewed": true, "readyForGeneration": true }))
    }

    /// Whether every earlier step has an answer.
    pub fn is_complete(&self) -> bool {
        [ids::CUSTOMER_TYPE, ids::CORE_PROBLEM, ids::LOCATION, ids::CUSTOMER_FOCUS, ids::KEY_FEATURES]
            .iter()
            .all(|id| self.answers.contains(id))
    }
}
