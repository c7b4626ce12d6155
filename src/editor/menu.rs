//! Command menu state.

use ratatui::layout::{Position, Rect};

use super::commands::{filter_commands, EditorCommand};
use super::document::Cursor;

/// Hint line shown above the entries.
pub const MENU_HINT: &str = "Type to filter, ↑↓ to navigate, ↵ to select";

/// Shown instead of an empty list.
pub const NO_COMMANDS: &str = "No commands found";

/// What the menu currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuView {
    /// Nothing matched the query
    Empty,
    /// A window of matching commands, with the highlighted one flagged
    Entries(Vec<(&'static EditorCommand, bool)>),
}

/// The filterable command menu anchored at a trigger character.
#[derive(Debug, Clone)]
pub struct CommandMenu {
    anchor: Option<Cursor>,
    query: String,
    highlighted: usize,
    scroll: usize,
    max_visible: usize,
    bounds: Option<Rect>,
}

impl CommandMenu {
    pub fn new(max_visible: usize) -> Self {
        Self {
            anchor: None,
            query: String::new(),
            highlighted: 0,
            scroll: 0,
            max_visible: max_visible.max(1),
            bounds: None,
        }
    }

    /// Open with an empty query. `anchor` is the position of the trigger character.
    pub fn open_at(&mut self, anchor: Cursor) {
        self.anchor = Some(anchor);
        self.query.clear();
        self.highlighted = 0;
        self.scroll = 0;
        self.bounds = None;
    }

    pub fn close(&mut self) {
        self.anchor = None;
        self.query.clear();
        self.bounds = None;
    }

    pub fn is_open(&self) -> bool {
        self.anchor.is_some()
    }

    /// Position of the trigger character that opened the menu.
    pub fn anchor(&self) -> Option<Cursor> {
        self.anchor
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the filter query. Resets the highlight when it changes.
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.highlighted = 0;
            self.scroll = 0;
        }
    }

    /// All commands matching the query, in catalog order.
    pub fn matches(&self) -> Vec<&'static EditorCommand> {
        filter_commands(&self.query)
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_command(&self) -> Option<&'static EditorCommand> {
        self.matches().get(self.highlighted).copied()
    }

    pub fn select_next(&mut self) {
        let count = self.matches().len();
        if count == 0 {
            return;
        }
        self.highlighted = (self.highlighted + 1) % count;
        self.scroll_to_highlight();
    }

    pub fn select_prev(&mut self) {
        let count = self.matches().len();
        if count == 0 {
            return;
        }
        self.highlighted = self.highlighted.checked_sub(1).unwrap_or(count - 1);
        self.scroll_to_highlight();
    }

    /// The visible window of entries.
    pub fn view(&self) -> MenuView {
        let matches = self.matches();
        if matches.is_empty() {
            return MenuView::Empty;
        }
        MenuView::Entries(
            matches
                .into_iter()
                .enumerate()
                .skip(self.scroll)
                .take(self.max_visible)
                .map(|(i, cmd)| (cmd, i == self.highlighted))
                .collect(),
        )
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Record where the menu was drawn.
    pub fn set_bounds(&mut self, area: Rect) {
        self.bounds = Some(area);
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Whether a screen point falls inside the drawn menu.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.bounds.is_some_and(|area| area.contains(Position::new(column, row)))
    }

    fn scroll_to_highlight(&mut self) {
        if self.highlighted < self.scroll {
            self.scroll = self.highlighted;
        } else if self.highlighted >= self.scroll + self.max_visible {
            self.scroll = self.highlighted + 1 - self.max_visible;
        }
    }
}

impl Default for CommandMenu {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_menu() -> CommandMenu {
        let mut menu = CommandMenu::default();
        menu.open_at(Cursor::new(0, 3));
        menu
    }

    #[test]
    fn test_open_shows_window_of_catalog() {
        let menu = open_menu();
        assert!(menu.is_open());
        assert_eq!(menu.query(), "");
        assert_eq!(menu.matches().len(), 13);
        match menu.view() {
            MenuView::Entries(entries) => {
                assert_eq!(entries.len(), 10);
                assert!(entries[0].1);
            }
            MenuView::Empty => panic!("expected entries"),
        }
    }

    #[test]
    fn test_empty_view() {
        let mut menu = open_menu();
        menu.set_query("nothing-matches-this");
        assert_eq!(menu.view(), MenuView::Empty);
        assert!(menu.highlighted_command().is_none());
    }

    #[test]
    fn test_navigation_wraps_and_scrolls() {
        let mut menu = open_menu();
        menu.select_prev();
        assert_eq!(menu.highlighted(), 12);
        assert_eq!(menu.highlighted_command().map(|c| c.id), Some("ai-generate"));
        match menu.view() {
            MenuView::Entries(entries) => assert!(entries.last().is_some_and(|(_, hl)| *hl)),
            MenuView::Empty => panic!("expected entries"),
        }

        menu.select_next();
        assert_eq!(menu.highlighted(), 0);
    }

    #[test]
    fn test_query_change_resets_highlight() {
        let mut menu = open_menu();
        menu.select_next();
        menu.set_query("h");
        assert_eq!(menu.highlighted(), 0);
    }

    #[test]
    fn test_bounds() {
        let mut menu = open_menu();
        assert!(!menu.contains(5, 5));
        menu.set_bounds(Rect::new(2, 2, 10, 6));
        assert!(menu.contains(5, 5));
        assert!(!menu.contains(20, 5));
        menu.close();
        assert!(!menu.contains(5, 5));
    }
}
