//! # Blueprint
//!
//! Guided business blueprint wizard for your terminal.
//!
//! Blueprint asks a short, adaptive series of questions about a business idea,
//! uses an LLM to suggest follow-up answers and differentiators, and turns the
//! result into a starter document you can keep editing in a block editor.
//!
//! ## Features
//!
//! - **Adaptive Wizard**: The step list is recomputed from the answers so far
//! - **AI Suggestions**: OpenAI or Claude, with built-in fallbacks when offline
//! - **Block Editor**: Slash-style command menu for headings, lists, and templates
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the wizard and open the result in the editor
//! blueprint wizard --edit
//!
//! # Edit an existing blueprint
//! blueprint edit blueprint.html
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::use_self)]

pub mod ai;
pub mod app;
pub mod core;
pub mod editor;
pub mod tui;
pub mod wizard;

// Re-export commonly used types
pub use app::App;
pub use core::{AnswerMap, Config, WizardFlow};
pub use editor::{Document, Editor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "blueprint";
