mod app;
mod catalog;
mod config;
mod constants;
mod detail;
mod display;
mod graphics;
mod input;
mod sink;
mod theme;
mod ui;
mod window;

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use tracing::info;

use app::App;
use display::CliDisplayMode;
use window::CliLayout;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Path or URL of the film catalog JSON (default: configured data file)
  #[arg(short, long)]
  catalog: Option<String>,

  /// Display mode: 'auto', 'direct', or 'ascii' (default: auto-detect)
  #[arg(short, long, default_value = "auto")]
  display_mode: CliDisplayMode,

  /// Gallery layout: 'auto', 'windowed', or 'full' (default: follow terminal width)
  #[arg(short, long, default_value = "auto")]
  layout: CliLayout,
}

// --- Logging ---

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  use tracing_subscriber::{EnvFilter, fmt, prelude::*};

  let dirs = ProjectDirs::from("", "", "marquee")?;
  let logs_dir = dirs.data_dir().join("logs");
  std::fs::create_dir_all(&logs_dir).ok();

  let file_appender = tracing_appender::rolling::daily(&logs_dir, "marquee.log");
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,marquee=debug"));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
    .init();

  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging();
  info!(version = env!("CARGO_PKG_VERSION"), "marquee starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let display_mode = display::resolve_display_mode(args.display_mode);
  let mut app = App::new(display_mode, args.layout.forced(), args.catalog);

  app.resize(terminal.size()?.width);
  app.trigger_catalog_load();

  loop {
    app.check_pending();
    app.tick(Instant::now());

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        Event::Resize(cols, _) => {
          app.resize(cols);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  Ok(())
}
