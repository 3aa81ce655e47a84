mod action;
mod api;
mod app;
mod auth;
mod config;
mod dump;
mod error;
mod event;
mod layout;
mod paginator;
mod sentinel;
mod source;
#[cfg(test)]
mod testing;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::api::LectureApi;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::source::LectureSource;
use crate::tui::EventHandler;

/// Browse open lectures in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (default: <config dir>/lectern/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override api.base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Override api.page_size
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,

    /// Print every public lecture to stdout instead of starting the UI
    #[arg(long)]
    dump: bool,

    /// With --dump, print JSON instead of tab-separated lines
    #[arg(long, requires = "dump")]
    json: bool,

    /// With --dump, stop after this many pages
    #[arg(long, requires = "dump", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(page_size) = cli.page_size {
        config.api.page_size = page_size;
    }

    let token = auth::load_token(&config.api);
    let page_size = config.api.page_size;
    let source: Arc<dyn LectureSource> = Arc::new(LectureApi::new(config.api, token));

    if cli.dump {
        let lectures = dump::collect(source.as_ref(), page_size, cli.max_pages).await?;
        let mut stdout = std::io::stdout().lock();
        if cli.json {
            dump::write_json(&mut stdout, &lectures)?;
        } else {
            dump::write_tsv(&mut stdout, &lectures)?;
        }
        return Ok(());
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(source, config.ui, page_size).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(
    source: Arc<dyn LectureSource>,
    ui_config: config::UiConfig,
    page_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;
    let size = terminal.size()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(
        source,
        ui_config,
        page_size,
        (size.width, size.height),
        action_tx.clone(),
    );

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
