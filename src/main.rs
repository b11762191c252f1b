//! shoprec-manager binary entry point.
//!
//! Parses the CLI configuration, initializes the terminal in raw mode, runs
//! the TUI event loop, and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::error::{Context, Result};

mod app;
mod error;
mod manager;
mod records;
mod search;
mod store;
mod ui;

/// Terminal front-end for the shop's customer, product and supplier records.
#[derive(Parser, Debug)]
#[command(name = "shoprec-manager", version, about)]
struct Cli {
    /// Base address of the records API.
    #[arg(
        long,
        env = "SHOPREC_API_URL",
        default_value = "http://localhost:5000/api"
    )]
    api_url: String,

    /// Theme configuration file (created with defaults when missing).
    #[arg(long, default_value = "theme.conf")]
    theme: String,

    /// Keybindings configuration file (created with defaults when missing).
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,

    /// Append tracing output to this file; the terminal itself is owned by
    /// the TUI, so there is no stdout logging.
    #[arg(long, env = "SHOPREC_LOG_FILE")]
    log_file: Option<String>,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn init_tracing(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_tracing(path).map_err(|e| format!("init tracing to {}: {}", path, e))?;
    }
    let config = app::AppConfig {
        api_url: cli.api_url,
        theme_path: cli.theme,
        keymap_path: cli.keybinds,
    };

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &config);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
