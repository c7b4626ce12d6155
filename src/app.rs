//! Application state and lifecycle management.
//!
//! This module contains the core `App` struct that holds all application state
//! and coordinates between the TUI, the wizard flow, and the block editor.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use crate::ai::{DifferentiatorRequest, SuggestionService};
use crate::core::{starter_blueprint, AnswerMap, Config, Transition, WizardFlow};
use crate::editor::{Document, Editor};
use crate::tui::Theme;
use crate::wizard::{
    FeatureFetch, FetchKind, StepForm, SuggestionDispatcher, SuggestionEvent, SuggestionRequest, Ticket,
};

/// Default file name for a saved blueprint.
pub const BLUEPRINT_FILE: &str = "blueprint.html";

/// Main application state.
///
/// The `App` struct is the central state container. It manages:
/// - The wizard flow and the form mounted for its active step
/// - Background suggestion requests and their results
/// - The block editor, once a document is open
#[derive(Debug)]
pub struct App {
    /// Application configuration
    pub config: Config,

    /// Current UI theme
    pub theme: Theme,

    /// Current mode of the application
    pub mode: AppMode,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Wizard flow controller
    pub flow: WizardFlow,

    /// Form for the active step
    pub form: Option<StepForm>,

    /// Answers from a completed run
    pub completed: Option<AnswerMap>,

    /// Open the starter blueprint in the editor when the run completes
    pub edit_on_complete: bool,

    /// Block editor, once a document is open
    pub editor: Option<Editor>,

    /// Where the editor saves to
    pub editor_path: Option<PathBuf>,

    /// Where the starter blueprint is saved (defaults to the output dir)
    pub blueprint_path: Option<PathBuf>,

    /// Bumped on every step mount; results for older mounts are discarded
    mount: u64,

    /// Suggestion runtime; absent when the app only edits a file
    dispatcher: Option<SuggestionDispatcher>,

    completion_rx: Receiver<AnswerMap>,

    dirty: Arc<AtomicBool>,
}

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Answering wizard steps
    #[default]
    Wizard,

    /// Editing a blueprint document
    Editor,
}

impl App {
    /// Create an app that starts on the first wizard step.
    ///
    /// # Errors
    ///
    /// Returns an error if the background runtime cannot be started.
    pub fn wizard(config: Config, service: SuggestionService) -> anyhow::Result<Self> {
        let dispatcher = SuggestionDispatcher::new(service)?;
        let mut app = Self::with_dispatcher(config, Some(dispatcher));
        app.mount();
        Ok(app)
    }

    /// Create an app that opens `path` in the editor. A missing file starts empty.
    ///
    /// No wizard step is mounted and no suggestion runtime is started.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn editor(config: Config, path: &Path) -> anyhow::Result<Self> {
        let document = if path.exists() {
            Document::from_markup(&std::fs::read_to_string(path)?)
        } else {
            Document::new()
        };

        let mut app = Self::with_dispatcher(config, None);
        app.open_editor(document, path.to_path_buf());
        Ok(app)
    }

    fn with_dispatcher(config: Config, dispatcher: Option<SuggestionDispatcher>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        let flow = WizardFlow::blueprint(Box::new(move |answers| {
            let _ = completion_tx.send(answers);
        }));
        let theme = Self::resolve_theme(&config);

        Self {
            edit_on_complete: config.general.open_editor_on_complete,
            config,
            theme,
            mode: AppMode::Wizard,
            should_quit: false,
            status_message: None,
            flow,
            form: None,
            completed: None,
            editor: None,
            editor_path: None,
            blueprint_path: None,
            mount: 0,
            dispatcher,
            completion_rx,
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the configured theme, falling back to the default.
    fn resolve_theme(config: &Config) -> Theme {
        Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.ui.theme, "Unknown theme, using default");
            Theme::default()
        })
    }

    /// Mount a fresh form for the active step and issue its initial request.
    fn mount(&mut self) {
        self.mount += 1;
        self.form = self
            .flow
            .current_step()
            .map(|step| StepForm::mount(step, self.flow.prior_answer(step.id)));

        let request = self.form.as_mut().and_then(StepForm::start);
        if let Some((kind, request)) = request {
            self.dispatch(kind, request);
        }
    }

    fn dispatch(&self, kind: FetchKind, request: SuggestionRequest) {
        let Some(step) = self.flow.current_step() else {
            return;
        };
        let Some(dispatcher) = &self.dispatcher else {
            tracing::debug!(step = step.id, "No suggestion runtime, dropping request");
            return;
        };
        let ticket = Ticket { step_id: step.id, mount: self.mount, kind };
        dispatcher.dispatch(ticket, request);
    }

    /// Submit the active form's answer.
    pub fn submit_step(&mut self) {
        let Some(payload) = self.form.as_ref().and_then(StepForm::payload) else {
            self.set_status("Complete this step to continue");
            return;
        };

        match self.flow.submit(payload) {
            Transition::Moved { .. } => {
                self.clear_status();
                self.mount();
            }
            Transition::Completed => self.finish_wizard(),
            Transition::Ignored => {}
        }
    }

    /// Go back one step. Returns false at the first step.
    pub fn go_back(&mut self) -> bool {
        match self.flow.retreat() {
            Transition::Moved { .. } => {
                self.clear_status();
                self.mount();
                true
            }
            _ => false,
        }
    }

    /// Pick the highlighted suggestion on the differentiators step.
    pub fn pick_feature(&mut self) {
        let request = match self.form.as_mut() {
            Some(StepForm::KeyFeatures(form)) => form.pick_highlighted(),
            _ => None,
        };
        self.request_more(request);
    }

    /// Add the typed differentiator.
    pub fn add_custom_feature(&mut self) {
        let request = match self.form.as_mut() {
            Some(StepForm::KeyFeatures(form)) => form.add_custom(),
            _ => None,
        };
        self.request_more(request);
    }

    fn request_more(&mut self, request: Option<DifferentiatorRequest>) {
        if let Some(request) = request {
            self.dispatch(
                FetchKind::Differentiators(FeatureFetch::Incremental),
                SuggestionRequest::Differentiators(request),
            );
        }
    }

    fn finish_wizard(&mut self) {
        let answers = self.completion_rx.try_recv().unwrap_or_else(|_| self.flow.answers().clone());
        self.form = None;

        if self.edit_on_complete {
            let document = starter_blueprint(&answers);
            let path = self.blueprint_path.clone().unwrap_or_else(|| {
                self.config.output_dir().unwrap_or_default().join(BLUEPRINT_FILE)
            });
            self.completed = Some(answers);
            self.open_editor(document, path);
            // Generated content has not been written anywhere yet
            self.dirty.store(true, Ordering::Relaxed);
            let hint = format!("Blueprint ready. Type {} for blocks, Ctrl+S to save", self.config.editor.trigger);
            self.set_status(hint);
        } else {
            self.completed = Some(answers);
            self.quit();
        }
    }

    fn open_editor(&mut self, document: Document, path: PathBuf) {
        let mut editor = Editor::new(document, &self.config.editor);
        editor.focus();
        let dirty = Arc::clone(&self.dirty);
        editor.on_change(Box::new(move |_markup| dirty.store(true, Ordering::Relaxed)));

        self.editor = Some(editor);
        self.editor_path = Some(path);
        self.mode = AppMode::Editor;
    }

    /// Name of the provider asked first, or `None` when answering offline.
    pub fn active_provider(&self) -> Option<&str> {
        self.dispatcher.as_ref().and_then(|dispatcher| dispatcher.service().active_provider())
    }

    /// Whether the editor has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }

    /// Write the editor's document to its path.
    pub fn save_editor(&mut self) {
        let (Some(editor), Some(path)) = (&self.editor, &self.editor_path) else {
            return;
        };

        let result = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(path, editor.to_markup()));

        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Saved blueprint");
                let message = format!("Saved {}", path.display());
                self.dirty.store(false, Ordering::Relaxed);
                self.set_status(message);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save blueprint");
                let message = format!("Save failed: {e}");
                self.set_status(message);
            }
        }
    }

    /// Set a status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Periodic update: apply settled suggestion requests.
    pub fn tick(&mut self) {
        let events = self.dispatcher.as_ref().map(SuggestionDispatcher::poll).unwrap_or_default();
        for event in events {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: SuggestionEvent) {
        let current = self.flow.current_step().map(|step| step.id);
        if event.ticket.mount != self.mount || current != Some(event.ticket.step_id) {
            tracing::debug!(
                step = event.ticket.step_id,
                mount = event.ticket.mount,
                "Discarding suggestions for unmounted step"
            );
            return;
        }

        let header = self.form.as_mut().and_then(|form| form.apply(event.ticket.kind, event.outcome));
        if let Some(header) = header {
            self.flow.set_dynamic_header(header.title, header.subtitle);
        }
    }

    /// Block until a request for the mounted step settles, then apply it.
    #[cfg(test)]
    fn settle(&mut self) {
        loop {
            let event = self
                .dispatcher
                .as_ref()
                .and_then(|dispatcher| dispatcher.wait(std::time::Duration::from_secs(5)));
            let Some(event) = event else {
                panic!("suggestion request did not settle");
            };
            let current = event.ticket.mount == self.mount;
            self.apply_event(event);
            if current {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids;

    fn app() -> App {
        App::wizard(Config::default(), SuggestionService::offline()).unwrap()
    }

    fn answer_fixed_steps(app: &mut App) {
        if let Some(StepForm::CustomerType(form)) = app.form.as_mut() {
            form.choose();
        }
        app.submit_step();
        if let Some(StepForm::CoreProblem(form)) = app.form.as_mut() {
            form.input.set("Slow invoicing");
        }
        app.submit_step();
        if let Some(StepForm::Location(form)) = app.form.as_mut() {
            form.choose();
        }
        app.submit_step();
    }

    #[test]
    fn test_starts_on_first_step() {
        let app = app();
        assert_eq!(app.mode, AppMode::Wizard);
        assert_eq!(app.flow.current_step().map(|s| s.id), Some(ids::CUSTOMER_TYPE));
        assert!(matches!(app.form, Some(StepForm::CustomerType(_))));
    }

    #[test]
    fn test_submit_without_answer_stays() {
        let mut app = app();
        app.submit_step();
        assert_eq!(app.flow.current_index(), 0);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_follow_up_header_published() {
        let mut app = app();
        answer_fixed_steps(&mut app);
        assert_eq!(app.flow.current_step().map(|s| s.id), Some(ids::CUSTOMER_FOCUS));
        assert_eq!(app.flow.header().title, None);

        app.settle();
        assert_eq!(app.flow.header().title.as_deref(), Some("Who are your customers?"));
        assert!(!app.form.as_ref().unwrap().is_loading());
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut app = app();
        answer_fixed_steps(&mut app);
        // Leave the step before the request settles
        assert!(app.go_back());

        std::thread::sleep(std::time::Duration::from_millis(200));
        app.tick();
        assert_eq!(app.flow.current_step().map(|s| s.id), Some(ids::LOCATION));
        assert_eq!(app.flow.header().title.as_deref(), Some("Where will you operate?"));
    }

    #[test]
    fn test_go_back_at_first_step() {
        let mut app = app();
        assert!(!app.go_back());
    }

    #[test]
    fn test_completion_quits_without_editor() {
        let mut app = app();
        answer_fixed_steps(&mut app);
        if let Some(StepForm::CustomerFocus(form)) = app.form.as_mut() {
            form.input.set("Founders");
        }
        app.submit_step();
        app.settle();
        app.pick_feature();
        app.submit_step();
        app.submit_step();

        assert!(app.flow.is_completed());
        assert!(app.should_quit);
        let answers = app.completed.unwrap();
        assert_eq!(answers.customer_focus(), "Founders");
        assert_eq!(answers.key_features(), vec!["10x faster processing"]);
    }

    #[test]
    fn test_completion_opens_editor() {
        let mut app = app();
        app.edit_on_complete = true;
        answer_fixed_steps(&mut app);
        if let Some(StepForm::CustomerFocus(form)) = app.form.as_mut() {
            form.input.set("Founders");
        }
        app.submit_step();
        app.settle();
        app.pick_feature();
        app.submit_step();
        app.submit_step();

        assert_eq!(app.mode, AppMode::Editor);
        assert!(!app.should_quit);
        let markup = app.editor.as_ref().unwrap().to_markup();
        assert!(markup.contains("<h1>Business Blueprint</h1>"));
        assert!(markup.contains("10x faster processing"));
    }

    #[test]
    fn test_editor_app_mounts_no_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::editor(Config::default(), &dir.path().join("plan.html")).unwrap();

        assert_eq!(app.mode, AppMode::Editor);
        assert!(app.form.is_none());
        assert!(app.dispatcher.is_none());
        assert_eq!(app.active_provider(), None);

        app.tick();
        assert!(app.form.is_none());
        assert!(!app.is_dirty());
    }

    #[test]
    fn test_editor_save_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.html");
        let mut app = App::editor(Config::default(), &path).unwrap();

        app.editor.as_mut().unwrap().key_char('H');
        assert!(app.is_dirty());
        app.save_editor();
        assert!(!app.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>H</p>");
    }
}
