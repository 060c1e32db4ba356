use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use automail_service::{BlockingHttpService, HttpService};
use automail_tui::app::App;
use automail_tui::config::Cli;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

/// Poll interval while a banner, flag or loading tail is counting down.
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let endpoints = cli
        .endpoints()
        .with_context(|| format!("invalid --api-url {:?}", cli.api_url))?;
    tracing::info!(api = %endpoints, timeout_secs = cli.timeout, "automail starting");

    let http = HttpService::with_timeout(endpoints, cli.timeout())?;
    let service = BlockingHttpService::from_service(http)?;

    run_tui(service)
}

fn init_logging(cli: &Cli) -> Result<()> {
    let path = cli.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(service: BlockingHttpService) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, service);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "automail exited with an error");
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: BlockingHttpService,
) -> Result<()> {
    let mut app = App::new(service);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        // The loading state is on screen now; run the queued request.
        if app.pending().is_some() {
            app.run_pending();
            continue;
        }

        if app.needs_polling() {
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if app.is_quit(key) {
                        break;
                    }
                    app.handle_key(key);
                }
            }
            app.tick(Instant::now());
        } else if let Event::Key(key) = event::read()? {
            if app.is_quit(key) {
                break;
            }
            app.handle_key(key);
        }
    }

    tracing::info!("automail exiting");
    Ok(())
}
