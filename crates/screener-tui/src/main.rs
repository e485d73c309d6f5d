use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use screener_core::{Config, HttpBackend, Overrides, Slot};
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

/// Screen a resume against a job description, then chat about the candidate.
#[derive(Parser, Debug)]
#[command(name = "screener", version, about)]
struct Cli {
    /// Base URL of the screening backend (overrides SCREENER_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Resume to preselect (PDF or TXT)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Job description to preselect (PDF or TXT)
    #[arg(long)]
    jd: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved backend settings back to the config file
    #[arg(long)]
    save_config: bool,

    /// Log file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> Result<PathBuf> {
    let cache_dir =
        dirs::cache_dir().ok_or_else(|| anyhow!("Could not determine cache directory"))?;
    Ok(cache_dir.join("resume-screener").join("screener.log"))
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone())?;

    // Resolve backend settings once
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;
    let overrides = Overrides {
        api_url: cli.api_url.clone(),
        request_timeout_secs: cli.timeout,
    };
    let settings = config.resolve(&overrides)?;
    if cli.save_config {
        settings.to_config().save_to(&config_path)?;
        tracing::info!(path = %config_path.display(), "config saved");
    }

    let backend = Arc::new(HttpBackend::new(&settings)?);
    tracing::info!(
        base_url = backend.base_url(),
        timeout = ?settings.request_timeout,
        "starting"
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(backend, events.sender());

    if let Some(path) = &cli.resume {
        app.preselect(Slot::Resume, &path.display().to_string());
    }
    if let Some(path) = &cli.jd {
        app.preselect(Slot::JobDescription, &path.display().to_string());
    }

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    tracing::info!("exiting");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
