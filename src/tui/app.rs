//! TUI application runner.
//!
//! Handles the main event loop and terminal setup/teardown.

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::{draw, handle_events, handle_mouse};
use crate::App;

/// Run the TUI application until the user quits or the wizard hands off.
///
/// Returns the app so the caller can read what the session produced.
pub fn run_tui(mut app: App) -> Result<App> {
    let mouse = app.config.ui.mouse;
    setup_terminal(mouse)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_main_loop(&mut terminal, &mut app);

    restore_terminal(mouse)?;

    result.map(|()| app)
}

/// Setup the terminal for TUI mode.
fn setup_terminal(mouse: bool) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    if mouse {
        execute!(stdout(), EnableMouseCapture)?;
    }

    // Setup panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(mouse);
        original_hook(panic_info);
    }));

    Ok(())
}

/// Restore the terminal to normal mode.
fn restore_terminal(mouse: bool) -> Result<()> {
    if mouse {
        execute!(stdout(), DisableMouseCapture)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Main event loop.
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw the UI
        terminal.draw(|frame| draw(frame, app))?;

        // Handle events
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_events(key, app),
                Event::Mouse(mouse) => handle_mouse(mouse, app),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }

        // Periodic tick
        app.tick();
    }

    Ok(())
}
