//! `kanboard`: terminal Kanban board with drag-and-drop.
//!
//! Cards move between the To Do, In Progress and Done lanes with the mouse
//! or the keyboard. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/kanboard/config.toml`).
//!
//! ```bash
//! # Demo board, kept in memory
//! cargo run --bin kanboard
//!
//! # Load and save a board file
//! cargo run --bin kanboard -- --board-file ~/board.bin
//!
//! # Start empty, with a longer drag threshold
//! KANBOARD_FILE=~/board.bin cargo run --bin kanboard -- --empty --drag-distance 3
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_appender::non_blocking::WorkerGuard;

use kanboard::app::App;
use kanboard::config::{AppConfig, CliArgs};
use kanboard::persist::{self, BoardFile};
use kanboard::ui;

fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // CLI args > config file > defaults
    let config = AppConfig::load(&cli).map_err(|e| {
        eprintln!("Error: {e}");
        io::Error::other(e)
    })?;

    // Logs go to a file, the terminal belongs to the UI
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("kanboard starting");

    let board_file = config.board_file.as_ref().map(BoardFile::new);
    let store = persist::load_store(
        board_file.as_ref(),
        config.seed_demo,
        config.max_task_title_len,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to load board");
        io::Error::other(e)
    })?;

    let mut app = App::new(store)
        .with_activation_distance(config.activation_distance)
        .with_timestamp_format(config.timestamp_format.clone());
    if let Some(file) = board_file {
        tracing::info!(path = %file.path().display(), "saving board to file");
        app = app.with_sink(Box::new(file));
    }

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    tracing::info!(tasks = app.store.len(), "kanboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("kanboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &AppConfig,
) -> io::Result<()> {
    loop {
        // Step 1: Hit testing uses the same geometry as the frame.
        let size = terminal.size()?;
        app.set_viewport(Rect::new(0, 0, size.width, size.height));

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                Event::FocusLost => app.handle_focus_lost(),
                _ => {}
            }
        }

        // Step 4: Save after committed changes.
        app.persist_if_changed();

        if app.should_quit {
            return Ok(());
        }
    }
}
