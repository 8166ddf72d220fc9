// TUI event loop and terminal management
use crate::{App, InputMode};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::debug;

/// Run the interactive browser until the user quits
///
/// The universe is already loaded at this point, every keystroke is handled
/// synchronously against it.
pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| crate::ui::render(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Dispatch one key press according to the current input mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    // Any key dismisses the last message
    app.status_message = None;

    match app.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.enter_normal_mode(),
            KeyCode::Tab => app.accept_suggestion(),
            KeyCode::Char(c) => app.push_query_char(c),
            KeyCode::Backspace => app.pop_query_char(),
            KeyCode::Down => app.next_result(),
            KeyCode::Up => app.previous_result(),
            _ => {}
        },
        InputMode::Filtering => match key.code {
            KeyCode::Esc | KeyCode::Char('f') => app.enter_normal_mode(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.next_field(),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.previous_field(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => app.nudge_field(true),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => app.nudge_field(false),
            KeyCode::Enter | KeyCode::Char(' ') => app.activate_field(),
            KeyCode::Char('R') => app.reset_filters(),
            KeyCode::Char('/') => app.enter_search_mode(),
            _ => {}
        },
        InputMode::PickingTopic => match key.code {
            KeyCode::Esc => app.leave_topic_mode(),
            KeyCode::Enter => app.select_topic(),
            KeyCode::Down => app.next_topic(),
            KeyCode::Up => app.previous_topic(),
            KeyCode::Backspace => app.topic_backspace(),
            KeyCode::Char(c) => app.push_topic_char(c),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('/') => app.enter_search_mode(),
            KeyCode::Char('f') | KeyCode::Char('F') => app.enter_filter_mode(),
            KeyCode::Char('R') => app.reset_filters(),
            KeyCode::Char('t') => app.toggle_selected_topic(),
            KeyCode::Char('j') | KeyCode::Down => app.next_result(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_result(),
            KeyCode::Enter => {
                let url = app.selected_listing().map(|l| l.entry.sponsor_url.clone());
                open_in_browser(app, url);
            }
            KeyCode::Char('o') => {
                let url = app.selected_listing().map(|l| l.repository.html_url.clone());
                open_in_browser(app, url);
            }
            _ => {}
        },
    }
}

fn open_in_browser(app: &mut App, url: Option<String>) {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return;
    };

    debug!("Opening {}", url);
    if let Err(e) = open::that(&url) {
        app.status_message = Some(format!("Failed to open browser: {}", e));
    }
}
