//! UK Carbon Intensity Dashboard
//!
//! A terminal UI that displays the current generation mix and the last 24 hours
//! of carbon intensity for the UK grid.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use carbondash::app::{App, AppState};
use carbondash::cli::{Cli, StartupConfig};
use carbondash::data::{load_dashboard, CachedFetcher, ConnectionConfig};
use carbondash::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match (&app.state, &app.dashboard) {
        (AppState::Dashboard, Some(dashboard)) => ui::render_dashboard(frame, app, dashboard),
        (AppState::Error(message), _) => ui::render_error(frame, app, message),
        _ => render_loading(frame),
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading carbon intensity data...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Fetches both tables once and prints them as JSON
async fn run_dump(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = CachedFetcher::new(ConnectionConfig::new(config.base_url.clone()));
    let dashboard = load_dashboard(&fetcher, config.ttl_seconds).await?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}

async fn run_tui(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Initial render to show loading state
    terminal.draw(|f| render_ui(f, &app))?;

    app.load_all_data().await;

    // Main event loop
    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }

        app.refresh_if_requested().await;
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    // stderr is free in dump mode; otherwise the TUI owns the terminal
    let log_dir = if config.dump {
        None
    } else {
        Some(logging::tui_log_dir())
    };
    if let Err(e) = logging::init(log_dir.as_deref()) {
        eprintln!("warning: {}", e);
    }

    let result = if config.dump {
        run_dump(&config).await
    } else {
        run_tui(&config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
