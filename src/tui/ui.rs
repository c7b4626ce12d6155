//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui.
//! Supports customizable themes via the Theme struct.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::Theme;
use crate::app::AppMode;
use crate::core::CustomerType;
use crate::editor::{self, Cursor, Editor, MenuView, MENU_HINT, NO_COMMANDS};
use crate::wizard::{
    CustomerTypeForm, FeaturesForm, FocusForm, LocationForm, ProblemForm, ReviewForm, StepForm, TextInput,
    LOCATIONS,
};
use crate::App;

/// Placeholder while an AI-driven step waits for its header.
const LOADING_TITLE: &str = "Thinking about your business…";

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main vertical layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    match app.mode {
        AppMode::Wizard => draw_wizard(frame, app, chunks[0]),
        AppMode::Editor => draw_editor(frame, app, chunks[0]),
    }
    draw_status_bar(frame, app, chunks[1]);
}

fn draw_wizard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress
            Constraint::Length(4), // Title and subtitle
            Constraint::Min(4),    // Form
        ])
        .split(area);

    draw_progress(frame, app, chunks[0]);
    draw_step_header(frame, app, chunks[1]);

    let theme = &app.theme;
    match &app.form {
        Some(StepForm::CustomerType(form)) => draw_customer_type(frame, form, theme, chunks[2]),
        Some(StepForm::CoreProblem(form)) => draw_problem(frame, form, theme, chunks[2]),
        Some(StepForm::Location(form)) => draw_location(frame, form, theme, chunks[2]),
        Some(StepForm::CustomerFocus(form)) => draw_focus(frame, form, theme, chunks[2]),
        Some(StepForm::KeyFeatures(form)) => draw_features(frame, form, theme, chunks[2]),
        Some(StepForm::Review(form)) => draw_review(frame, form, theme, chunks[2]),
        None => {
            let empty = Paragraph::new("No step to show").style(Style::default().fg(theme.text_muted));
            frame.render_widget(empty, chunks[2]);
        }
    }
}

fn draw_progress(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let (position, count, percent) = app.flow.progress();

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.primary).bg(theme.selected_bg))
        .label(Span::styled(
            format!("Step {position} of {count} · {percent}%"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ))
        .percent(u16::from(percent));

    frame.render_widget(gauge, area);
}

fn draw_step_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let header = app.flow.header();

    let title = match header.title {
        Some(title) => Span::styled(title, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        None => Span::styled(
            LOADING_TITLE,
            Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
        ),
    };
    let mut lines = vec![Line::default(), Line::from(title)];
    if let Some(subtitle) = header.subtitle {
        lines.push(Line::from(Span::styled(subtitle, Style::default().fg(theme.text_dim))));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_customer_type(frame: &mut Frame, form: &CustomerTypeForm, theme: &Theme, area: Rect) {
    let items: Vec<ListItem> = CustomerType::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let is_highlighted = i == form.highlighted;
            let marker = if form.selected == Some(*kind) { "● " } else { "○ " };
            let bg = if is_highlighted { theme.selected_bg } else { theme.background };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme.accent)),
                    Span::styled(kind.title(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
                ]),
                Line::from(Span::styled(
                    format!("  {}", kind.description()),
                    Style::default().fg(theme.text_dim),
                )),
                Line::from(Span::styled(
                    format!("  e.g. {}", kind.examples()),
                    Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
                )),
                Line::default(),
            ])
            .style(Style::default().bg(bg))
        })
        .collect();

    frame.render_widget(List::new(items).block(panel(" Audience ", theme)), area);
}

fn draw_problem(frame: &mut Frame, form: &ProblemForm, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let placeholder = "e.g. Small teams lose hours reconciling invoices";
    draw_input(frame, &form.input, " Core problem ", placeholder, theme, chunks[0]);
}

fn draw_location(frame: &mut Frame, form: &LocationForm, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(if form.is_other() { 3 } else { 0 })])
        .split(area);

    let items: Vec<ListItem> = LOCATIONS
        .iter()
        .enumerate()
        .map(|(i, location)| {
            let marker = if form.selected == Some(i) { "● " } else { "○ " };
            let style = if i == form.highlighted {
                Style::default().fg(theme.text).bg(theme.selected_bg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(*location, style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(panel(" Location ", theme)), chunks[0]);
    if form.is_other() {
        draw_input(frame, &form.custom, " Specify location ", "Country or region", theme, chunks[1]);
    }
}

fn draw_focus(frame: &mut Frame, form: &FocusForm, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    if form.loading {
        draw_loading(frame, "Generating a question for you…", theme, chunks[0]);
    } else {
        let items = suggestion_items(
            form.suggestions.iter().map(|s| (s.label(), s.elaboration())),
            form.highlighted,
            theme,
        );
        frame.render_widget(List::new(items).block(panel(" Suggestions (Tab to use) ", theme)), chunks[0]);
    }

    draw_input(frame, &form.input, " Your answer ", "Type your own or pick a suggestion", theme, chunks[1]);
}

fn draw_features(frame: &mut Frame, form: &FeaturesForm, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    let selected: Vec<Span> = if form.selected.is_empty() {
        vec![Span::styled("Nothing selected yet", Style::default().fg(theme.text_muted))]
    } else {
        form.selected
            .iter()
            .flat_map(|label| {
                [
                    Span::styled(format!(" {label} "), Style::default().fg(theme.background).bg(theme.secondary)),
                    Span::raw(" "),
                ]
            })
            .collect()
    };
    let chips = Paragraph::new(Line::from(selected))
        .wrap(Wrap { trim: true })
        .block(panel(" Selected (Ctrl+D removes last) ", theme));
    frame.render_widget(chips, chunks[0]);

    if form.loading {
        draw_loading(frame, "Finding differentiators…", theme, chunks[1]);
    } else {
        let mut items = suggestion_items(
            form.suggestions.iter().map(|s| (s.label(), s.elaboration())),
            form.highlighted,
            theme,
        );
        if form.loading_more {
            items.push(ListItem::new(Span::styled(
                "  Finding another idea…",
                Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
            )));
        }
        frame.render_widget(List::new(items).block(panel(" Suggestions (Tab to add) ", theme)), chunks[1]);
    }

    draw_input(frame, &form.custom, " Add your own ", "Press Enter to add", theme, chunks[2]);
}

fn draw_review(frame: &mut Frame, form: &ReviewForm, theme: &Theme, area: Rect) {
    let mut lines: Vec<Line> = form
        .summary()
        .into_iter()
        .flat_map(|(label, value)| {
            [
                Line::from(Span::styled(label, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(format!("  {value}"), Style::default().fg(theme.text))),
            ]
        })
        .collect();

    if !form.is_complete() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Some answers are missing. Go back with Esc to fill them in.",
            Style::default().fg(theme.warning),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(panel(" Review ", theme));
    frame.render_widget(paragraph, area);
}

fn suggestion_items<'a>(
    suggestions: impl Iterator<Item = (&'a str, Option<&'a str>)>,
    highlighted: usize,
    theme: &Theme,
) -> Vec<ListItem<'a>> {
    suggestions
        .enumerate()
        .map(|(i, (label, elaboration))| {
            let is_highlighted = i == highlighted;
            let mut spans = vec![
                Span::styled(if is_highlighted { "› " } else { "  " }, Style::default().fg(theme.accent)),
                Span::styled(label, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            ];
            if let Some(elaboration) = elaboration {
                spans.push(Span::styled(format!(" {elaboration}"), Style::default().fg(theme.text_dim)));
            }
            let bg = if is_highlighted { theme.selected_bg } else { theme.background };
            ListItem::new(Line::from(spans)).style(Style::default().bg(bg))
        })
        .collect()
}

fn draw_input(
    frame: &mut Frame,
    input: &TextInput,
    title: &'static str,
    placeholder: &'static str,
    theme: &Theme,
    area: Rect,
) {
    let text = if input.value().is_empty() {
        Span::styled(placeholder, Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC))
    } else {
        Span::styled(input.value(), Style::default().fg(theme.text))
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(panel(title, theme)), area);

    if area.height > 2 {
        let x = area.x + 1 + input.cursor().min(usize::from(area.width.saturating_sub(3))) as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_loading(frame: &mut Frame, message: &'static str, theme: &Theme, area: Rect) {
    let loading = Paragraph::new(Span::styled(
        message,
        Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
    ))
    .block(panel(" Suggestions ", theme));
    frame.render_widget(loading, area);
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title)
        .title_style(Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD))
}

/// Render the document, then the command menu over it.
fn draw_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme;
    let show_icons = app.config.ui.show_icons;
    let title = app
        .editor_path
        .as_ref()
        .map(|p| format!(" {}{} ", p.display(), if app.is_dirty() { " •" } else { "" }))
        .unwrap_or_else(|| " Blueprint ".to_string());
    let Some(editor) = app.editor.as_mut() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .title(title)
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);

    let rendered = render_document(editor, &theme, inner.width);
    let scroll = rendered.cursor.map_or(0, |(row, _)| row.saturating_sub(inner.height.saturating_sub(1)));
    let paragraph = Paragraph::new(rendered.lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    let Some((row, column)) = rendered.cursor else {
        return;
    };
    let caret = (inner.x + column.min(inner.width.saturating_sub(1)), inner.y + row - scroll);
    frame.set_cursor_position(caret);

    if editor.menu().is_open() {
        draw_command_menu(frame, editor, &theme, show_icons, caret, area);
    }
}

/// Document lines plus the caret as (row, column) within them.
struct RenderedDocument {
    lines: Vec<Line<'static>>,
    cursor: Option<(u16, u16)>,
}

fn render_document(editor: &Editor, theme: &Theme, width: u16) -> RenderedDocument {
    let caret = editor.cursor();
    let mut lines = Vec::new();
    let mut cursor = None;

    for (index, block) in editor.document().blocks().iter().enumerate() {
        let start = lines.len();
        render_block(block, theme, width, &mut lines);

        if let Some(Cursor { block: b, offset }) = caret {
            if b == index {
                let prefix = block_prefix(block).chars().count();
                cursor = Some((start as u16, (prefix + offset) as u16));
            }
        }
    }

    RenderedDocument { lines, cursor }
}

fn block_prefix(block: &editor::Block) -> &'static str {
    match block {
        editor::Block::Heading { level: 1, .. } => "# ",
        editor::Block::Heading { level: 2, .. } => "## ",
        editor::Block::Heading { .. } => "### ",
        editor::Block::Todo { checked: true, .. } => "[x] ",
        editor::Block::Todo { .. } => "[ ] ",
        editor::Block::Quote(_) => "│ ",
        editor::Block::Code(_) => "  ",
        _ => "",
    }
}

fn render_block(block: &editor::Block, theme: &Theme, width: u16, lines: &mut Vec<Line<'static>>) {
    let prefix = block_prefix(block);
    match block {
        editor::Block::Paragraph(text) => {
            lines.push(Line::from(Span::styled(text.clone(), Style::default().fg(theme.text))));
        }
        editor::Block::Heading { text, .. } => {
            let style = Style::default().fg(theme.primary).add_modifier(Modifier::BOLD);
            lines.push(Line::from(vec![Span::styled(prefix, style), Span::styled(text.clone(), style)]));
        }
        editor::Block::List { ordered, items } => {
            for (i, item) in items.iter().enumerate() {
                let bullet = if *ordered { format!("{}. ", i + 1) } else { "• ".to_string() };
                lines.push(Line::from(vec![
                    Span::styled(bullet, Style::default().fg(theme.accent)),
                    Span::styled(inline_text(item), Style::default().fg(theme.text)),
                ]));
            }
        }
        editor::Block::Todo { checked, text } => {
            let style = if *checked {
                Style::default().fg(theme.text_muted).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(theme.text)
            };
            lines.push(Line::from(vec![
                Span::styled(prefix, Style::default().fg(theme.accent)),
                Span::styled(text.clone(), style),
            ]));
        }
        editor::Block::Quote(text) => {
            lines.push(Line::from(vec![
                Span::styled(prefix, Style::default().fg(theme.border)),
                Span::styled(text.clone(), Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC)),
            ]));
        }
        editor::Block::Code(text) => {
            lines.push(Line::from(vec![
                Span::raw(prefix),
                Span::styled(text.clone(), Style::default().fg(theme.secondary).bg(theme.selected_bg)),
            ]));
        }
        editor::Block::Divider => {
            lines.push(Line::from(Span::styled(
                "─".repeat(usize::from(width)),
                Style::default().fg(theme.border),
            )));
        }
        editor::Block::Section(children) => {
            for child in children {
                render_block(child, theme, width, lines);
            }
        }
        editor::Block::AiPlaceholder => {
            lines.push(Line::from(Span::styled(
                "✨ Generate with AI",
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )));
        }
        editor::Block::Raw(markup) => {
            lines.push(Line::from(Span::styled(inline_text(markup), Style::default().fg(theme.text_dim))));
        }
    }
}

/// Text content of inline markup, entities decoded.
fn inline_text(markup: &str) -> String {
    scraper::Html::parse_fragment(markup).root_element().text().collect()
}

/// Draw the block menu below the caret and record where it went.
fn draw_command_menu(
    frame: &mut Frame,
    editor: &mut Editor,
    theme: &Theme,
    show_icons: bool,
    caret: (u16, u16),
    bounds: Rect,
) {
    let view = editor.menu().view();
    let rows = match &view {
        MenuView::Empty => 1,
        MenuView::Entries(entries) => entries.len() as u16,
    };

    let width = 48.min(bounds.width);
    let height = (rows + 3).min(bounds.height);
    let below = caret.1 + 1;
    let y = if below + height <= bounds.bottom() { below } else { caret.1.saturating_sub(height) };
    let x = caret.0.min(bounds.right().saturating_sub(width));
    let popup = Rect::new(x, y.max(bounds.y), width, height);

    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(Span::styled(MENU_HINT, Style::default().fg(theme.text_muted)))];
    match view {
        MenuView::Empty => {
            lines.push(Line::from(Span::styled(NO_COMMANDS, Style::default().fg(theme.text_dim))));
        }
        MenuView::Entries(entries) => {
            for (command, is_highlighted) in entries {
                let bg = if is_highlighted { theme.selected_bg } else { theme.background };
                let icon = if show_icons { format!(" {:>3} ", command.icon.glyph()) } else { " ".to_string() };
                lines.push(
                    Line::from(vec![
                        Span::styled(icon, Style::default().fg(theme.accent)),
                        Span::styled(command.label, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  {}", command.description), Style::default().fg(theme.text_dim)),
                    ])
                    .style(Style::default().bg(bg)),
                );
            }
        }
    }

    let title = format!(" {}{} ", editor.trigger(), editor.menu().query());
    let menu = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(title)
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(menu, popup);
    editor.set_menu_bounds(popup);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let (mode, hints) = match app.mode {
        AppMode::Wizard => (" WIZARD ", "Enter next • Esc back • Ctrl+C quit"),
        AppMode::Editor => (" EDIT ", "Ctrl+S save • Esc close menu • Ctrl+Q quit"),
    };
    let mut spans = vec![
        Span::styled(mode, Style::default().bg(theme.accent).fg(theme.background).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ];
    if let Some(message) = &app.status_message {
        spans.push(Span::styled(message.clone(), Style::default().fg(theme.highlight)));
        spans.push(Span::styled(" │ ", Style::default().fg(theme.border)));
    }
    spans.push(Span::styled(hints, Style::default().fg(theme.text_muted)));
    if app.mode == AppMode::Wizard {
        let source = app.active_provider().map_or_else(|| "offline".to_string(), |name| format!("ai: {name}"));
        spans.push(Span::styled(format!(" │ {source}"), Style::default().fg(theme.text_muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::SuggestionService;
    use crate::core::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_wizard_first_step_renders() {
        let mut app = App::wizard(Config::default(), SuggestionService::offline()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Step 1 of 6"));
        assert!(text.contains("Who are you building this for?"));
        assert!(text.contains("External Customers & Clients"));
    }

    #[test]
    fn test_menu_bounds_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::editor(Config::default(), &dir.path().join("doc.html")).unwrap();
        app.editor.as_mut().unwrap().key_char('/');

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Heading 1"));
        assert!(app.editor.as_ref().unwrap().menu().bounds().is_some());
    }

    #[test]
    fn test_inline_text_decodes_entities() {
        assert_eq!(inline_text("Fast &amp; <strong>cheap</strong>"), "Fast & cheap");
    }
}
