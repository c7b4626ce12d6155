//! Accumulated wizard answers.
//!
//! The answer map is keyed by step identifier and holds the open-ended
//! payload each step submitted. Typed accessors read the fields later steps
//! depend on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::step::ids;

/// An answer payload submitted by a single step.
pub type AnswerPayload = Value;

/// Mapping from step identifier to that step's submitted payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    entries: BTreeMap<String, AnswerPayload>,
}

impl AnswerMap {
    /// Create an empty answer map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the payload for a step.
    pub fn insert(&mut self, step_id: impl Into<String>, payload: AnswerPayload) {
        self.entries.insert(step_id.into(), payload);
    }

    /// Get the payload recorded for a step.
    pub fn get(&self, step_id: &str) -> Option<&AnswerPayload> {
        self.entries.get(step_id)
    }

    /// Check whether a step has an answer.
    pub fn contains(&self, step_id: &str) -> bool {
        self.entries.contains_key(step_id)
    }

    /// Step identifiers with recorded answers, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over all recorded answers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerPayload)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded answers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no answers have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a string field from a step's payload.
    pub fn field(&self, step_id: &str, field: &str) -> Option<&str> {
        self.get(step_id).and_then(|payload| payload.get(field)).and_then(Value::as_str)
    }

    /// Raw customer-type classification ("external" / "internal"), empty if unanswered.
    pub fn customer_type(&self) -> &str {
        self.field(ids::CUSTOMER_TYPE, "customerType").unwrap_or_default()
    }

    /// Core problem description, empty if unanswered.
    pub fn problem(&self) -> &str {
        self.field(ids::CORE_PROBLEM, "problem").unwrap_or_default()
    }

    /// Operating location, empty if unanswered.
    pub fn location(&self) -> &str {
        self.field(ids::LOCATION, "location").unwrap_or_default()
    }

    /// Target customer / stakeholder focus, empty if unanswered.
    pub fn customer_focus(&self) -> &str {
        self.field(ids::CUSTOMER_FOCUS, "customerFocus").unwrap_or_default()
    }

    /// Selected key differentiators.
    pub fn key_features(&self) -> Vec<String> {
        self.get(ids::KEY_FEATURES)
            .and_then(|payload| payload.get("keyFeatures"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Serialize the answers as pretty JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Who the solution is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// External customers, clients, or users
    External,
    /// Internal teams and operations
    Internal,
}

impl CustomerType {
    /// All customer types, in display order.
    pub const ALL: [Self; 2] = [Self::External, Self::Internal];

    /// Parse an exact classification string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "external" => Some(Self::External),
            "internal" => Some(Self::Internal),
            _ => None,
        }
    }

    /// Classify loosely: anything other than "external" counts as internal.
    pub fn classify(value: &str) -> Self {
        if value == "external" {
            Self::External
        } else {
            Self::Internal
        }
    }

    /// Wire value used in payloads and service requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Internal => "internal",
        }
    }

    /// Heading shown when choosing.
    pub fn title(&self) -> &'static str {
        match self {
            Self::External => "External Customers & Clients",
            Self::Internal => "Internal Operations & Tools",
        }
    }

    /// One-line explanation shown when choosing.
    pub fn description(&self) -> &'static str {
        match self {
            Self::External => {
                "Building a product or service for external customers, clients, or users"
            }
            Self::Internal => {
                "Building internal tools, processes, or systems for your organization"
            }
        }
    }

    /// Example projects for this type.
    pub fn examples(&self) -> &'static str {
        match self {
            Self::External => "B2B services, consumer products, marketplace platforms",
            Self::Internal => "HR systems, inventory management, workflow automation",
        }
    }

    /// Label for the audience this type targets.
    pub fn audience_label(&self) -> &'static str {
        match self {
            Self::External => "Target customers",
            Self::Internal => "Internal teams",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
