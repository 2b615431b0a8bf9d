//! KeeStats TUI - password statistics for KeePass databases
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod handlers;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, AppState};

/// KeeStats - password statistics for KeePass databases
#[derive(Parser, Debug)]
#[command(name = "keestats")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the KeePass database file (overrides config)
    #[arg(short, long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Start with statistics limited to the selected group's own entries
    #[arg(long)]
    flat: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("keestats=info".parse()?))
        .with_writer(std::io::stderr) // Write logs to stderr to not interfere with TUI
        .init();

    let args = Args::parse();

    let mut config = config::Config::load(args.config)?;
    if let Some(database_path) = args.database {
        tracing::info!("Overriding database path from CLI: {}", database_path.display());
        config.database_path = database_path;
    }
    if args.flat {
        config.recursive = false;
    }
    tracing::info!("Starting KeeStats with database: {}", config.database_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key) {
                    break;
                }
            }
        }

        if matches!(app.state, AppState::Quit) {
            break;
        }
    }

    Ok(())
}
