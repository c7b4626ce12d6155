//! Core types and functionality for Blueprint.
//!
//! This module contains the wizard's fundamental pieces: configuration,
//! the answer map, step definitions, the flow controller, and the starter
//! blueprint built from a completed run.

mod answers;
mod blueprint;
mod config;
mod flow;
mod step;

pub use answers::{AnswerMap, AnswerPayload, CustomerType};
pub use blueprint::{starter_blueprint, starter_blueprint_on, BLUEPRINT_SECTIONS};
pub use config::{AiConfig, Config, EditorConfig, GeneralConfig, UiConfig};
pub use flow::{CompletionCallback, FlowState, StepGenerator, StepHeader, Transition, WizardFlow};
pub use step::{generate_steps, ids, StepContext, StepKind, WizardStep};
