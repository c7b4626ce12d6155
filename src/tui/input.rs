//! Input handling for the TUI.
//!
//! Processes keyboard and mouse events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::AppMode;
use crate::wizard::{StepForm, TextInput};
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Wizard => handle_wizard_mode(key, app),
        AppMode::Editor => handle_editor_mode(key, app),
    }
}

/// Handle mouse events.
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    if app.mode != AppMode::Editor {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(editor) = app.editor.as_mut() {
            editor.pointer_down(mouse.column, mouse.row);
        }
    }
}

/// Handle input on a wizard step.
fn handle_wizard_mode(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            if !app.go_back() {
                app.quit();
            }
            return;
        }
        KeyCode::Enter => {
            handle_wizard_enter(app);
            return;
        }
        KeyCode::Tab if matches!(app.form, Some(StepForm::KeyFeatures(_))) => {
            app.pick_feature();
            return;
        }
        _ => {}
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };

    match form {
        StepForm::CustomerType(form) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                form.select_prev();
                form.choose();
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                form.select_next();
                form.choose();
            }
            KeyCode::Char(' ') => form.choose(),
            _ => {}
        },
        StepForm::CoreProblem(form) => edit_text(&mut form.input, key),
        StepForm::Location(form) => match key.code {
            KeyCode::Up => {
                form.select_prev();
                form.choose();
            }
            KeyCode::Down | KeyCode::Tab => {
                form.select_next();
                form.choose();
            }
            _ if form.is_other() => edit_text(&mut form.custom, key),
            _ => {}
        },
        StepForm::CustomerFocus(form) => match key.code {
            KeyCode::Up => form.select_prev(),
            KeyCode::Down => form.select_next(),
            KeyCode::Tab => form.pick_highlighted(),
            _ => edit_text(&mut form.input, key),
        },
        StepForm::KeyFeatures(form) => match key.code {
            KeyCode::Up => form.select_prev(),
            KeyCode::Down => form.select_next(),
            KeyCode::Char('d') if ctrl => form.remove_last(),
            _ => edit_text(&mut form.custom, key),
        },
        StepForm::Review(_) => {}
    }
}

/// Enter: choose on option steps, add a typed differentiator, else submit.
fn handle_wizard_enter(app: &mut App) {
    match app.form.as_mut() {
        Some(StepForm::CustomerType(form)) if form.selected.is_none() => form.choose(),
        Some(StepForm::Location(form)) if form.selected.is_none() => form.choose(),
        _ => {}
    }

    let has_custom = matches!(&app.form, Some(StepForm::KeyFeatures(form)) if !form.custom.is_blank());
    if has_custom {
        app.add_custom_feature();
    } else {
        app.submit_step();
    }
}

/// Apply a key to a single-line text input.
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return;
    }
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        _ => {}
    }
}

/// Handle input in the block editor.
fn handle_editor_mode(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('s') if ctrl => {
            app.save_editor();
            return;
        }
        KeyCode::Char('q') if ctrl => {
            app.quit();
            return;
        }
        _ => {}
    }

    let Some(editor) = app.editor.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => editor.key_char(c),
        KeyCode::Enter => editor.newline(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Esc => {
            editor.escape();
        }
        KeyCode::Left => editor.cursor_left(),
        KeyCode::Right => editor.cursor_right(),
        KeyCode::Up => editor.cursor_up(),
        KeyCode::Down => editor.cursor_down(),
        KeyCode::Tab if editor.menu().is_open() => {
            editor.execute_highlighted();
        }
        _ => {}
    }
}
