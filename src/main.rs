use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};
use tracing::info;

use topicfinder::app::App;
use topicfinder::config::Config;
use topicfinder::events;
use topicfinder::openai::CompletionClient;
use topicfinder::ui;

/// Generate final year project topic suggestions from your terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Completion model to use (overrides TOPICFINDER_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Completions endpoint URL (overrides OPENAI_API_URL).
    #[arg(long)]
    endpoint: Option<String>,

    /// Log file path.
    #[arg(long, default_value = "topicfinder.log")]
    log_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for the API key).
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The TUI owns stdout, so logs go to a file.
    let file_appender = tracing_appender::rolling::never(".", &cli.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicfinder=info")),
        )
        .init();

    // Resolve configuration before touching the terminal so a missing API
    // key fails with a readable message.
    let mut config = Config::from_env().context("configuration error")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(endpoint) = cli.endpoint {
        config.completions_url = endpoint;
    }

    info!(model = %config.model, "starting TopicFinder");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(CompletionClient::new(config));
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();
    info!("TopicFinder exited");

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.drain_outcomes();
        app.tick = app.tick.wrapping_add(1);

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if events::handle_key_event(app, key)? {
                    return Ok(());
                }
            }
        }
    }
}
