//! Block editor with a slash-style command menu.
//!
//! The [`Editor`] owns a [`Document`], the active selection, and the
//! [`CommandMenu`]. Typing the trigger character opens the menu; further
//! typing refines the query; selecting a command replaces the trigger and
//! query with the command's blocks.

mod commands;
mod document;
mod markup;
mod menu;

pub use commands::{catalog, filter_commands, find, EditorCommand, Icon, Insertion};
pub use document::{Block, Cursor, Document, EditError, EditResult, Selection};
pub use markup::{parse, parse_template, to_markup, MarkupError, AI_PLACEHOLDER_MARKUP};
pub use menu::{CommandMenu, MenuView, MENU_HINT, NO_COMMANDS};

use std::fmt;

use crate::core::EditorConfig;

/// Receives the serialized document after every content change.
pub type ChangeCallback = Box<dyn FnMut(&str) + Send>;

/// Interactive block editor state.
pub struct Editor {
    document: Document,
    selection: Option<Selection>,
    menu: CommandMenu,
    trigger: char,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("blocks", &self.document.len())
            .field("selection", &self.selection)
            .field("menu_open", &self.menu.is_open())
            .field("trigger", &self.trigger)
            .finish()
    }
}

impl Editor {
    /// Create an editor over `document`. No cursor is active until [`Editor::focus`].
    pub fn new(document: Document, config: &EditorConfig) -> Self {
        Self {
            document,
            selection: None,
            menu: CommandMenu::new(config.max_visible_commands),
            trigger: config.trigger,
            on_change: None,
        }
    }

    /// Create an editor from markup.
    pub fn from_markup(markup: &str, config: &EditorConfig) -> Self {
        Self::new(Document::from_markup(markup), config)
    }

    /// Register the change callback.
    pub fn on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Serialized document content.
    pub fn to_markup(&self) -> String {
        self.document.to_markup()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The caret (selection head), if a cursor is active.
    pub fn cursor(&self) -> Option<Cursor> {
        self.selection.map(|s| s.head)
    }

    /// Place the cursor at the end of the document, adding a paragraph if
    /// there is nowhere to type.
    pub fn focus(&mut self) {
        if self.selection.is_some() {
            return;
        }
        let had = self.document.len();
        let cursor = self.document.ensure_editable();
        self.selection = Some(Selection::caret(cursor));
        if self.document.len() != had {
            self.emit_change();
        }
    }

    /// Drop the cursor and close the menu.
    pub fn blur(&mut self) {
        self.selection = None;
        self.menu.close();
    }

    /// Move the caret. Invalid positions are rejected and leave state unchanged.
    pub fn set_cursor(&mut self, cursor: Cursor) -> EditResult<()> {
        self.set_selection(Selection::caret(cursor))
    }

    /// Set the selection. Both ends must be valid text positions.
    ///
    /// Moving the head away from the caret closes the menu.
    pub fn set_selection(&mut self, selection: Selection) -> EditResult<()> {
        self.document.validate(selection.anchor)?;
        self.document.validate(selection.head)?;
        if self.menu.is_open() && self.cursor() != Some(selection.head) {
            self.menu.close();
        }
        self.selection = Some(selection);
        Ok(())
    }

    /// Handle a typed character.
    ///
    /// Typing the trigger opens the menu anchored at the trigger position.
    /// While the menu is open, every change re-derives the query.
    pub fn key_char(&mut self, c: char) {
        let Some(cursor) = self.collapse_selection() else {
            return;
        };

        if c == self.trigger {
            self.menu.open_at(cursor);
            tracing::debug!(block = cursor.block, offset = cursor.offset, "Command menu opened");
        }

        match self.document.insert_text(cursor, c.encode_utf8(&mut [0; 4])) {
            Ok(next) => {
                self.selection = Some(Selection::caret(next));
                self.emit_change();
                self.refine_query();
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring keystroke"),
        }
    }

    /// Enter: executes the highlighted command when the menu is open,
    /// otherwise splits the current block.
    pub fn newline(&mut self) {
        if self.menu.is_open() {
            self.execute_highlighted();
            return;
        }
        let Some(cursor) = self.collapse_selection() else {
            return;
        };
        match self.document.split_block(cursor) {
            Ok(next) => {
                self.selection = Some(Selection::caret(next));
                self.emit_change();
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring newline"),
        }
    }

    /// Backspace: removes the selection, or the character before the cursor.
    pub fn backspace(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };

        let result = if selection.is_collapsed() {
            self.document.delete_backward(selection.head)
        } else {
            let (start, end) = selection.ordered();
            self.document.delete_range(start, end)
        };

        match result {
            Ok(next) => {
                self.selection = Some(Selection::caret(next));
                self.emit_change();
                self.refine_query();
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring backspace"),
        }
    }

    /// Close the menu. Returns whether it was open.
    pub fn escape(&mut self) -> bool {
        let was_open = self.menu.is_open();
        self.menu.close();
        was_open
    }

    /// Pointer press at a screen position. Closes the menu when outside its
    /// bounds; returns whether it was closed.
    pub fn pointer_down(&mut self, column: u16, row: u16) -> bool {
        if self.menu.is_open() && !self.menu.contains(column, row) {
            self.menu.close();
            return true;
        }
        false
    }

    /// Record where the menu was drawn, for pointer hit-testing.
    pub fn set_menu_bounds(&mut self, area: ratatui::layout::Rect) {
        self.menu.set_bounds(area);
    }

    pub fn cursor_left(&mut self) {
        self.move_cursor(|doc, c| {
            if c.offset > 0 {
                return Some(Cursor::new(c.block, c.offset - 1));
            }
            let prev = doc.blocks()[..c.block].iter().rposition(Block::is_editable)?;
            Some(Cursor::new(prev, doc.blocks()[prev].char_len()))
        });
    }

    pub fn cursor_right(&mut self) {
        self.move_cursor(|doc, c| {
            if c.offset < doc.blocks()[c.block].char_len() {
                return Some(Cursor::new(c.block, c.offset + 1));
            }
            let next = c.block + 1 + doc.blocks()[c.block + 1..].iter().position(Block::is_editable)?;
            Some(Cursor::new(next, 0))
        });
    }

    /// Up: moves the menu highlight when open, else to the previous text block.
    pub fn cursor_up(&mut self) {
        if self.menu.is_open() {
            self.menu.select_prev();
            return;
        }
        self.move_cursor(|doc, c| {
            let prev = doc.blocks()[..c.block].iter().rposition(Block::is_editable)?;
            Some(Cursor::new(prev, c.offset.min(doc.blocks()[prev].char_len())))
        });
    }

    /// Down: moves the menu highlight when open, else to the next text block.
    pub fn cursor_down(&mut self) {
        if self.menu.is_open() {
            self.menu.select_next();
            return;
        }
        self.move_cursor(|doc, c| {
            let next = c.block + 1 + doc.blocks()[c.block + 1..].iter().position(Block::is_editable)?;
            Some(Cursor::new(next, c.offset.min(doc.blocks()[next].char_len())))
        });
    }

    /// Execute the highlighted menu entry, if any.
    pub fn execute_highlighted(&mut self) -> bool {
        match self.menu.highlighted_command() {
            Some(command) => self.execute_command(command),
            None => {
                self.menu.close();
                false
            }
        }
    }

    /// Execute a command by id. Unknown ids are ignored.
    pub fn execute(&mut self, id: &str) -> bool {
        match find(id) {
            Some(command) => self.execute_command(command),
            None => {
                tracing::debug!(id, "Unknown editor command");
                false
            }
        }
    }

    /// Run a command at the cursor and return whether the document changed.
    ///
    /// Removes the trigger and query, deletes any selection, then inserts the
    /// command's blocks as one unit and places the cursor after them. Without
    /// an active cursor this only closes the menu.
    pub fn execute_command(&mut self, command: &EditorCommand) -> bool {
        let anchor = self.menu.anchor();
        let query = self.menu.query().to_string();
        self.menu.close();

        let Some(selection) = self.selection else {
            return false;
        };

        let nodes = match command.build() {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(command = command.id, error = %e, "Command produced no content");
                return false;
            }
        };

        let (mut start, end) = selection.ordered();
        if let Some(anchor) = anchor {
            if self.typed_since(anchor, start, &query) {
                start = anchor;
            } else {
                tracing::debug!(command = command.id, "Trigger text moved, inserting at cursor");
            }
        }

        let at = if start == end {
            start
        } else {
            match self.document.delete_range(start, end) {
                Ok(at) => at,
                Err(e) => {
                    tracing::debug!(error = %e, "Cannot clear range for command");
                    return false;
                }
            }
        };

        match self.document.insert_at(at, nodes) {
            Ok(next) => {
                tracing::debug!(command = command.id, "Executed editor command");
                self.selection = Some(Selection::caret(next));
                self.emit_change();
                true
            }
            Err(e) => {
                tracing::debug!(command = command.id, error = %e, "Cannot insert command content");
                false
            }
        }
    }

    /// Re-derive the menu query from the text between the trigger and the caret.
    fn refine_query(&mut self) {
        if !self.menu.is_open() {
            return;
        }
        let Some(cursor) = self.cursor() else {
            self.menu.close();
            return;
        };

        let before = self.document.text_before(cursor).unwrap_or_default();
        let Some(index) = before.rfind(self.trigger) else {
            self.menu.close();
            return;
        };

        let candidate = &before[index + self.trigger.len_utf8()..];
        let previous = self.menu.query().chars().count();
        let current = candidate.chars().count();

        // A bigger jump means the cursor moved rather than a keystroke
        if current.abs_diff(previous) > 1 {
            tracing::debug!(previous, current, "Query jumped, closing command menu");
            self.menu.close();
            return;
        }

        let anchor = Cursor::new(cursor.block, before[..index].chars().count());
        let query = candidate.to_string();
        if self.menu.anchor() != Some(anchor) {
            self.menu.open_at(anchor);
        }
        self.menu.set_query(&query);
    }

    /// Whether exactly the trigger and `query` sit between `anchor` and `caret`.
    fn typed_since(&self, anchor: Cursor, caret: Cursor, query: &str) -> bool {
        if anchor.block != caret.block || anchor.offset + 1 + query.chars().count() != caret.offset {
            return false;
        }
        let mut typed = String::with_capacity(query.len() + 1);
        typed.push(self.trigger);
        typed.push_str(query);
        self.document.text_before(caret).is_some_and(|before| before.ends_with(&typed))
    }

    /// Delete a non-collapsed selection; returns the caret to type at.
    fn collapse_selection(&mut self) -> Option<Cursor> {
        let selection = self.selection?;
        if selection.is_collapsed() {
            return Some(selection.head);
        }

        let (start, end) = selection.ordered();
        match self.document.delete_range(start, end) {
            Ok(at) => {
                self.selection = Some(Selection::caret(at));
                self.emit_change();
                Some(at)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Cannot delete selection");
                None
            }
        }
    }

    fn move_cursor(&mut self, step: impl Fn(&Document, Cursor) -> Option<Cursor>) {
        let Some(cursor) = self.cursor() else {
            return;
        };
        self.menu.close();
        if let Some(next) = step(&self.document, cursor) {
            self.selection = Some(Selection::caret(next));
        } else {
            self.selection = Some(Selection::caret(cursor));
        }
    }

    fn emit_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            let markup = self.document.to_markup();
            callback(&markup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn editor_with(text: &str) -> Editor {
        Editor::new(
            Document::from_blocks(vec![Block::Paragraph(text.into())]),
            &EditorConfig::default(),
        )
    }

    fn type_str(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            editor.key_char(c);
        }
    }

    #[test]
    fn test_trigger_opens_full_menu() {
        let mut editor = editor_with("Hello world");
        editor.set_cursor(Cursor::new(0, 5)).unwrap();
        editor.key_char('/');

        assert!(editor.menu().is_open());
        assert_eq!(editor.menu().query(), "");
        assert_eq!(editor.menu().matches().len(), catalog().len());
    }

    #[test]
    fn test_typing_refines_query() {
        let mut editor = editor_with("Hello world");
        editor.set_cursor(Cursor::new(0, 5)).unwrap();
        type_str(&mut editor, "/head");

        assert_eq!(editor.menu().query(), "head");
        let ids: Vec<_> = editor.menu().matches().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["heading1", "heading2", "heading3"]);
    }

    #[test]
    fn test_execute_replaces_trigger_and_query() {
        let mut editor = editor_with("Hello world");
        editor.set_cursor(Cursor::new(0, 5)).unwrap();
        type_str(&mut editor, "/head");
        editor.newline();

        assert!(!editor.menu().is_open());
        assert_eq!(
            editor.document().blocks(),
            &[
                Block::Paragraph("Hello".into()),
                Block::Heading { level: 1, text: "Heading 1".into() },
                Block::Paragraph(" world".into()),
            ]
        );
        assert_eq!(editor.cursor(), Some(Cursor::new(2, 0)));
    }

    #[test]
    fn test_execute_without_cursor_is_noop() {
        let mut editor = editor_with("Hello");
        let before = editor.to_markup();

        assert!(!editor.execute("swot-template"));
        assert_eq!(editor.to_markup(), before);
    }

    #[test]
    fn test_escape_closes_without_mutation() {
        let mut editor = editor_with("");
        editor.focus();
        editor.key_char('/');
        let before = editor.to_markup();

        assert!(editor.escape());
        assert!(!editor.menu().is_open());
        assert_eq!(editor.to_markup(), before);
    }

    #[test]
    fn test_pointer_outside_closes_menu() {
        let mut editor = editor_with("");
        editor.focus();
        editor.key_char('/');
        editor.set_menu_bounds(ratatui::layout::Rect::new(0, 1, 40, 12));

        assert!(!editor.pointer_down(5, 5));
        assert!(editor.menu().is_open());
        assert!(editor.pointer_down(60, 5));
        assert!(!editor.menu().is_open());
    }

    #[test]
    fn test_deleting_trigger_closes_menu() {
        let mut editor = editor_with("");
        editor.focus();
        type_str(&mut editor, "/h");
        editor.backspace();
        assert_eq!(editor.menu().query(), "");
        editor.backspace();
        assert!(!editor.menu().is_open());
    }

    #[test]
    fn test_no_matches_shows_empty_view() {
        let mut editor = editor_with("");
        editor.focus();
        type_str(&mut editor, "/qqq");
        assert_eq!(editor.menu().view(), MenuView::Empty);
    }

    #[test]
    fn test_template_inserted_as_unit() {
        let mut editor = editor_with("");
        editor.focus();
        type_str(&mut editor, "/swot");
        assert!(editor.execute_highlighted());

        let blocks = editor.document().blocks();
        assert!(matches!(&blocks[0], Block::Section(children) if children.len() == 9));
        assert_eq!(blocks[1], Block::Paragraph(String::new()));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut editor = editor_with("Hello world");
        editor.set_selection(Selection::span(Cursor::new(0, 6), Cursor::new(0, 11))).unwrap();
        type_str(&mut editor, "there");
        assert_eq!(editor.document().blocks(), &[Block::Paragraph("Hello there".into())]);
    }

    #[test]
    fn test_change_callback_receives_markup() {
        let (tx, rx) = mpsc::channel();
        let mut editor = editor_with("");
        editor.on_change(Box::new(move |markup| {
            let _ = tx.send(markup.to_string());
        }));
        editor.focus();
        editor.key_char('a');

        assert_eq!(rx.try_iter().last().as_deref(), Some("<p>a</p>"));
    }

    #[test]
    fn test_cursor_jump_closes_menu() {
        let mut editor = editor_with("abc");
        editor.set_cursor(Cursor::new(0, 3)).unwrap();
        editor.key_char('/');
        editor.cursor_left();
        assert!(!editor.menu().is_open());
    }

    #[test]
    fn test_moving_caret_closes_menu_and_keeps_text() {
        let mut editor = editor_with("Hello world");
        editor.set_cursor(Cursor::new(0, 5)).unwrap();
        editor.key_char('/');
        editor.set_cursor(Cursor::new(0, 12)).unwrap();
        assert!(!editor.menu().is_open());

        assert!(editor.execute("divider"));
        assert_eq!(
            editor.document().blocks(),
            &[Block::Paragraph("Hello/ world".into()), Block::Divider, Block::Paragraph(String::new())]
        );
    }

    #[test]
    fn test_same_caret_selection_keeps_menu() {
        let mut editor = editor_with("");
        editor.focus();
        type_str(&mut editor, "/he");
        editor.set_cursor(Cursor::new(0, 3)).unwrap();
        assert!(editor.menu().is_open());
        assert_eq!(editor.menu().query(), "he");
    }

    #[test]
    fn test_query_jump_closes_menu() {
        let mut editor = editor_with("");
        editor.focus();
        type_str(&mut editor, "/abc");
        editor.set_selection(Selection::span(Cursor::new(0, 1), Cursor::new(0, 4))).unwrap();
        assert!(editor.menu().is_open());

        editor.backspace();
        assert!(!editor.menu().is_open());
        assert_eq!(editor.to_markup(), "<p>/</p>");
    }

    #[test]
    fn test_menu_navigation_keys() {
        let mut editor = editor_with("");
        editor.focus();
        editor.key_char('/');
        editor.cursor_down();
        assert_eq!(editor.menu().highlighted_command().map(|c| c.id), Some("heading2"));
        editor.cursor_up();
        assert_eq!(editor.menu().highlighted_command().map(|c| c.id), Some("heading1"));
    }
}
