//! A terminal study deck.
//!
//! Type a topic, generate flashcards or a multiple-choice quiz from the
//! study backend, then flip cards or answer questions and grade yourself.
//! Run with `--print-config-path` to see where settings and key bindings live.

mod api;
mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::StudyClient;
use crate::app::{
    api_runtime::{spawn_job, ApiUpdate},
    cycle,
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::mode::Mode;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = "Generate and study flashcards or MCQ quizzes in the terminal")]
struct Cli {
    /// Backend base URL (overrides the config file).
    #[arg(long)]
    server: Option<String>,

    /// Prefill the topic field.
    #[arg(long)]
    topic: Option<String>,

    /// Prefill the count field.
    #[arg(long)]
    count: Option<u32>,

    /// Initial study mode.
    #[arg(long, value_parser = ["flashcard", "mcq"])]
    mode: Option<String>,

    /// Initial difficulty.
    #[arg(long)]
    difficulty: Option<String>,

    /// Sign in with this email before generating.
    #[arg(long)]
    email: Option<String>,

    /// Password for `--email`.
    #[arg(long, env = "STUDYDECK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Write logs to this file instead of the default next to the config.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the config file path and exit.
    #[arg(long = "print-config-path")]
    print_config_path: bool,
}

// ───────────────────────────────────────── logging ───────────

/// Where logs go: `--log-file`, or a file next to the config.  Never the
/// terminal, which belongs to the TUI.
fn log_target(cli: &Cli) -> PathBuf {
    cli.log_file.clone().unwrap_or_else(config::log_path)
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path).with_context(|| format!("cannot open log file {}", path.display()))
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false);
    match open_log(&log_target(cli)) {
        Ok(file) => builder.with_writer(Mutex::new(file)).init(),
        Err(e) if cli.log_file.is_some() => return Err(e),
        // Default location unusable: drop logs rather than draw over the UI.
        Err(_) => builder.with_writer(io::sink).init(),
    }
    Ok(())
}

/// Build the initial state from the config file plus CLI overrides.
/// Overrides only touch the session, never the saved config.
fn initial_state(cli: &Cli, config: AppConfig) -> AppState {
    let mut state = AppState::new(config);
    if let Some(topic) = &cli.topic {
        state.topic = topic.clone();
    }
    if let Some(count) = cli.count {
        state.count = count.to_string();
    }
    if let Some(mode) = &cli.mode {
        state.set_mode(Mode::from_tab_label(mode));
    }
    if let Some(difficulty) = &cli.difficulty {
        state.difficulty = difficulty.clone();
    }
    state
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config_path {
        println!("{}", config::config_path().display());
        return Ok(());
    }

    init_tracing(&cli)?;

    let user_config = AppConfig::load();
    let server_url = cli
        .server
        .clone()
        .unwrap_or_else(|| user_config.server_url.clone());
    let client = StudyClient::new(&server_url)?;
    info!(server = %client.base_url(), "starting");

    let email = cli.email.clone().or_else(|| user_config.email.clone());
    let mut state = initial_state(&cli, user_config);
    match (email, cli.password.clone()) {
        (Some(email), Some(password)) => cycle::request_login(&mut state, email, password),
        (Some(email), None) => warn!(%email, "email given without a password; not signing in"),
        _ => {}
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (api_tx, mut api_rx) = tokio::sync::mpsc::unbounded_channel::<ApiUpdate>();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| ui::render(frame, &mut state))?;

        // Jobs queued by the last event go out after the frame that shows
        // the waiting message.
        for job in state.pending_jobs.drain(..) {
            spawn_job(client.clone(), api_tx.clone(), job);
        }

        if state.config_dirty {
            state.config_dirty = false;
            if let Err(e) = state.config.save() {
                warn!(error = %e, "could not save config");
            }
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Paste(text) => handler::handle_paste(&mut state, &text),
                    AppEvent::Resize(w, h) => handler::on_resize(&mut state, w, h),
                    AppEvent::Tick => handler::on_tick(&mut state, Instant::now()),
                }
            }

            Some(update) = api_rx.recv() => {
                cycle::apply_update(&mut state, update, Instant::now());
                while let Ok(update) = api_rx.try_recv() {
                    cycle::apply_update(&mut state, update, Instant::now());
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    Ok(())
}
