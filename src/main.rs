//! f5-news — a subreddit front page that keeps itself fresh, in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//!                 set_*()            prefs (watch)
//! ┌──────────┐ ─────────► ┌──────────┐ ─────────► ┌──────────┐
//! │ input.rs │            │  app.rs  │            │ poll.rs  │
//! └──────────┘            │ (state)  │ ◄───────── │  (task)  │
//!                         └──────────┘ FeedUpdate └──────────┘
//!                              │ draw()                │ fetch()
//!                              ▼                       ▼
//!                         ┌──────────┐            ┌──────────┐
//!                         │  ui.rs   │            │ source/  │
//!                         └──────────┘            └──────────┘
//! ```
//!
//! * **`prefs`** — the four user preferences and their single-writer store.
//! * **`loading`** — the fetch-in-progress flag (writer in the poller,
//!   reader in the UI).
//! * **`source/`** — the `FeedSource` trait and the Reddit implementation.
//! * **`poll`** — the polling controller: timer, cancellation, generations.
//! * **`app`** — owns UI state (displayed posts, selection, preferences).
//! * **`ui`** / **`theme`** — pure rendering.
//! * **`input`** — maps key events to `App` / preference mutations.
//! * **`config`** / **`logging`** — CLI flags and file logging.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod config;
mod input;
mod loading;
mod logging;
mod poll;
mod prefs;
mod source;
mod theme;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use app::App;
use config::Cli;
use loading::LoadingSignal;
use prefs::PreferenceStore;
use source::RedditSource;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal and log the panic before the default hook prints it.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        error!("panic: {info}");
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_file)?;
    install_panic_hook();
    info!(version = env!("CARGO_PKG_VERSION"), "f5-news starting");

    // -- preferences + polling -----------------------------------------------
    let store = PreferenceStore::new(cli.preferences());
    let source = RedditSource::new(&cli.source_config()).context("building HTTP client")?;
    let (loading, indicator) = LoadingSignal::new();
    let (mut updates, poller) = poll::spawn(Arc::new(source), store.subscribe(), loading);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(store, indicator);
    let mut events = EventStream::new();

    // -- main event loop -----------------------------------------------------
    // Redraws after every key, feed update or tick.  The tick keeps the
    // loading bar animated while a fetch is in flight.
    let mut tick = tokio::time::interval(Duration::from_millis(120));

    loop {
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        tokio::select! {
            Some(update) = updates.recv() => {
                app.apply_update(update);
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => input::handle_key_event(&mut app, key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("reading terminal events"),
                None => break,
            },
            _ = tick.tick() => app.on_tick(),
        }

        if app.quit {
            break;
        }
    }

    poller.abort();
    info!("f5-news exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
