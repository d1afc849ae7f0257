//! `deficit`: match symptoms to likely vitamin and mineral deficiencies.
//!
//! # Usage
//!
//! ```
//! deficit                                  # interactive TUI
//! deficit score fatigue hair-loss --save   # one-shot scoring
//! deficit history
//! deficit --config ~/.config/deficit/config.toml replay 1
//! ```

mod app;
mod backend;
mod commands;
mod settings;
mod ui;

use std::{
  fs::OpenOptions,
  io::{self, Write as _},
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use backend::Backend;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use deficit_core::{catalog::Catalog, history::HistoryStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{DEFAULT_CONFIG_PATH, Settings};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "deficit",
  version,
  about = "Match symptoms to likely vitamin and mineral deficiencies"
)]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
  config: PathBuf,

  /// SQLite file for history, favorites and theme.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Catalog JSON to use instead of the bundled one.
  #[arg(long, value_name = "FILE")]
  catalog: Option<PathBuf>,

  /// Append logs to this file.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Run one command and exit instead of starting the TUI.
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List known symptom ids and labels.
  Symptoms,
  /// Score a set of symptoms.
  Score {
    #[arg(required = true, value_name = "SYMPTOM")]
    symptoms: Vec<String>,
    /// Save the session to history.
    #[arg(long)]
    save:     bool,
  },
  /// List saved sessions, newest first.
  History,
  /// Re-score a saved session (1 = newest).
  Replay { position: usize },
  /// Add or remove a substance from favorites.
  Favorite { id: String },
  /// List favorite substances.
  Favorites,
  /// Show or set the theme.
  Theme { mode: Option<ThemeMode> },
  /// Show everything known about one substance.
  Show { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeMode {
  Dark,
  Light,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let cli = Cli::parse();

  let settings = Settings::load(&cli.config)?.override_with(
    cli.store,
    cli.catalog,
    cli.log_file,
  );
  init_tracing(settings.log_file.as_deref(), cli.command.is_some())?;
  tracing::debug!(?settings, "loaded settings");

  let catalog = match &settings.catalog_path {
    Some(path) => Catalog::from_path(path)
      .with_context(|| format!("loading catalog {}", path.display()))?,
    None => Catalog::builtin().context("loading bundled catalog")?,
  };

  let (store, fallback) = Backend::open_or_memory(&settings.store_path);
  let mut history = HistoryStore::open(store);

  let Some(command) = cli.command else {
    let mut app = App::new(catalog, history);
    if let Some(msg) = fallback {
      app.status_msg = msg;
    }
    return run_tui(&mut app);
  };

  if let Some(msg) = fallback {
    eprintln!("warning: {msg}");
  }
  let mut out = io::stdout().lock();
  match command {
    Command::Symptoms => commands::symptoms(&catalog, &mut out)?,
    Command::Score { symptoms, save } => {
      commands::score(&catalog, &mut history, &symptoms, save, &mut out)?
    }
    Command::History => commands::history(&catalog, &history, &mut out)?,
    Command::Replay { position } => {
      commands::replay(&catalog, &history, position, &mut out)?
    }
    Command::Favorite { id } => {
      commands::favorite(&catalog, &mut history, &id, &mut out)?
    }
    Command::Favorites => commands::favorites(&catalog, &history, &mut out)?,
    Command::Theme { mode } => {
      let set = mode.map(|m| matches!(m, ThemeMode::Dark));
      commands::theme(&mut history, set, &mut out)?
    }
    Command::Show { id } => commands::show(&catalog, &history, &id, &mut out)?,
  }
  out.flush()?;
  Ok(())
}

/// Logs go to `log_file` when set. Otherwise one-shot commands log warnings
/// to stderr and the TUI logs nothing, since stderr shares its terminal.
fn init_tracing(log_file: Option<&Path>, one_shot: bool) -> Result<()> {
  if let Some(path) = log_file {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else if one_shot {
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::WARN.into())
          .from_env_lossy(),
      )
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

fn run_tui(app: &mut App<Backend>) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<Backend>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if !event::poll(Duration::from_millis(250)).context("polling events")? {
      continue;
    }
    match event::read().context("reading event")? {
      Event::Key(key) if key.kind == event::KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Redrawn on the next iteration.
      Event::Resize(_, _) => {}
      _ => {}
    }
  }
  Ok(())
}
