//! Block Editor Integration Tests
//!
//! Exercises the trigger menu and command insertion through the public editor API.

use std::sync::{Arc, Mutex};

use ratatui::layout::Rect;

use blueprint::core::EditorConfig;
use blueprint::editor::{Block, Cursor, Document, Editor, MenuView};

fn focused(markup: &str) -> Editor {
    let mut editor = Editor::from_markup(markup, &EditorConfig::default());
    editor.focus();
    editor
}

fn type_str(editor: &mut Editor, text: &str) {
    for c in text.chars() {
        editor.key_char(c);
    }
}

fn labels(editor: &Editor) -> Vec<&'static str> {
    match editor.menu().view() {
        MenuView::Entries(entries) => entries.iter().map(|(cmd, _)| cmd.label).collect(),
        MenuView::Empty => Vec::new(),
    }
}

// ============================================================================
// Menu Tests
// ============================================================================

#[test]
fn test_trigger_filters_headings() {
    let mut editor = focused("");
    type_str(&mut editor, "/head");

    assert!(editor.menu().is_open());
    assert_eq!(editor.menu().query(), "head");
    assert_eq!(labels(&editor), vec!["Heading 1", "Heading 2", "Heading 3"]);
}

#[test]
fn test_empty_query_shows_window() {
    let mut editor = focused("");
    editor.key_char('/');

    let view = editor.menu().view();
    let MenuView::Entries(entries) = view else {
        panic!("expected entries");
    };
    assert_eq!(entries.len(), 10);
    assert!(entries[0].1);
    assert_eq!(editor.menu().matches().len(), 13);
}

#[test]
fn test_no_matches_then_enter_only_closes() {
    let mut editor = focused("<p>Plan</p>");
    type_str(&mut editor, " /zzz");
    assert_eq!(editor.menu().view(), MenuView::Empty);

    editor.newline();
    assert!(!editor.menu().is_open());
    assert_eq!(editor.document().len(), 1);
    assert_eq!(editor.to_markup(), "<p>Plan /zzz</p>");
}

#[test]
fn test_escape_keeps_typed_text() {
    let mut editor = focused("");
    type_str(&mut editor, "a/b");
    assert!(editor.escape());
    editor.key_char('c');

    assert!(!editor.menu().is_open());
    assert_eq!(editor.to_markup(), "<p>a/bc</p>");
}

#[test]
fn test_backspace_past_trigger_closes() {
    let mut editor = focused("");
    type_str(&mut editor, "/q");
    editor.backspace();
    assert!(editor.menu().is_open());
    assert_eq!(editor.menu().query(), "");

    editor.backspace();
    assert!(!editor.menu().is_open());
}

#[test]
fn test_pointer_outside_menu_closes() {
    let mut editor = focused("");
    editor.key_char('/');
    editor.set_menu_bounds(Rect::new(2, 2, 30, 12));

    assert!(!editor.pointer_down(5, 5));
    assert!(editor.menu().is_open());
    assert!(editor.pointer_down(60, 1));
    assert!(!editor.menu().is_open());
}

#[test]
fn test_arrow_keys_move_highlight() {
    let mut editor = focused("");
    type_str(&mut editor, "/head");
    editor.cursor_down();
    editor.cursor_down();
    assert_eq!(editor.menu().highlighted_command().map(|c| c.id), Some("heading3"));

    editor.cursor_down();
    assert_eq!(editor.menu().highlighted(), 0);
}

// ============================================================================
// Command Execution Tests
// ============================================================================

#[test]
fn test_enter_replaces_trigger_with_heading() {
    let mut editor = focused("");
    type_str(&mut editor, "/head");
    editor.newline();

    assert!(!editor.menu().is_open());
    assert_eq!(editor.to_markup(), "<h1>Heading 1</h1>\n<p></p>");
    assert_eq!(editor.cursor(), Some(Cursor::new(1, 0)));
}

#[test]
fn test_command_splits_paragraph_mid_text() {
    let mut editor = focused("<p>Before after</p>");
    editor.set_cursor(Cursor::new(0, 7)).unwrap();
    type_str(&mut editor, "/divid");
    editor.newline();

    assert_eq!(
        editor.document().blocks(),
        &[
            Block::Paragraph("Before ".into()),
            Block::Divider,
            Block::Paragraph("after".into()),
        ]
    );
}

#[test]
fn test_template_inserted_as_one_section() {
    let mut editor = focused("");
    type_str(&mut editor, "/swot");
    assert_eq!(labels(&editor), vec!["SWOT Analysis"]);
    editor.newline();

    let blocks = editor.document().blocks();
    assert_eq!(blocks.len(), 2);
    assert!(matches!(&blocks[0], Block::Section(children) if !children.is_empty()));
    assert_eq!(blocks[1], Block::Paragraph(String::new()));
}

#[test]
fn test_execute_by_id_without_cursor_is_noop() {
    let mut editor = Editor::new(Document::new(), &EditorConfig::default());
    assert!(!editor.execute("quote"));
    assert!(editor.document().is_empty());

    editor.focus();
    assert!(editor.execute("quote"));
    assert!(editor.to_markup().starts_with("<blockquote>"));
    assert!(!editor.execute("no-such-command"));
}

#[test]
fn test_change_callback_receives_markup() {
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&seen);

    let mut editor = focused("");
    editor.on_change(Box::new(move |markup| sink.lock().unwrap().push(markup.to_string())));
    type_str(&mut editor, "Hi");
    editor.escape();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["<p>H</p>".to_string(), "<p>Hi</p>".to_string()]);
}

#[test]
fn test_custom_trigger() {
    let config = EditorConfig { trigger: '>', ..EditorConfig::default() };
    let mut editor = Editor::new(Document::new(), &config);
    editor.focus();
    type_str(&mut editor, "/>quo");

    assert_eq!(editor.menu().query(), "quo");
    editor.newline();
    assert_eq!(editor.document().blocks()[0], Block::Paragraph("/".into()));
}

// ============================================================================
// Markup Tests
// ============================================================================

#[test]
fn test_loaded_markup_serializes_back() {
    let markup = "<h2>Plan</h2>\n<p>Grow &amp; hire</p>\n<hr>";
    let editor = focused(markup);
    assert_eq!(editor.to_markup(), markup);
}

#[test]
fn test_inline_markup_survives_edit_and_save() {
    let markup = concat!(
        r#"<p>Revenue is <strong>up 20%</strong>, see <a href="x">report</a></p>"#,
        "\n<h5>Sources</h5>",
        "\n<p>Notes</p>",
    );
    let mut editor = focused(markup);
    assert_eq!(editor.cursor(), Some(Cursor::new(2, 5)));
    type_str(&mut editor, " Q3");

    assert_eq!(
        editor.to_markup(),
        concat!(
            r#"<p>Revenue is <strong>up 20%</strong>, see <a href="x">report</a></p>"#,
            "\n<h5>Sources</h5>",
            "\n<p>Notes Q3</p>",
        )
    );
}

#[test]
fn test_moved_caret_does_not_swallow_text() {
    let mut editor = focused("<p>Hello world</p>");
    editor.set_cursor(Cursor::new(0, 5)).unwrap();
    editor.key_char('/');
    editor.set_cursor(Cursor::new(0, 12)).unwrap();

    assert!(!editor.menu().is_open());
    assert!(editor.execute("divider"));
    assert_eq!(editor.document().blocks()[0], Block::Paragraph("Hello/ world".into()));
}

#[test]
fn test_focus_on_divider_only_adds_paragraph() {
    let editor = focused("<hr>");
    assert_eq!(editor.document().len(), 2);
    assert_eq!(editor.cursor(), Some(Cursor::new(1, 0)));
}
