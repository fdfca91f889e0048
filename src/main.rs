use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info};

use study_portal::{logger, spawn_api_worker, ui, ApiResponse, App, Config, StudyClient};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logger::init(&config.log_file)
        .with_context(|| format!("initializing log file {}", config.log_file.display()))?;

    let client = StudyClient::new(&config.server_url).context("configuring API client")?;
    info!(server = %client.base_url(), "starting study-portal");

    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (response_tx, mut response_rx) = mpsc::unbounded_channel();
    let worker = spawn_api_worker(Arc::new(client), request_rx, response_tx);

    let mut app = App::new(config.settings(), request_tx);
    app.load_categories();

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app, &mut response_rx).await;
    restore_terminal(&mut terminal)?;

    drop(app);
    worker.abort();

    if let Err(e) = &result {
        error!("event loop failed: {e:#}");
    }
    result
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

async fn run(
    terminal: &mut Tui,
    app: &mut App,
    responses: &mut UnboundedReceiver<ApiResponse>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("reading terminal events"),
                None => break,
            },
            Some(response) = responses.recv() => app.apply_response(response),
        }
    }

    info!("quitting");
    Ok(())
}
