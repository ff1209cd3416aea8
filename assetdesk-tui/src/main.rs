//! AssetDesk terminal client entry point.

use assetdesk_client::{HttpClient, SessionStore};
use assetdesk_query::QueryClient;
use assetdesk_tui::config::AppConfig;
use assetdesk_tui::error::TuiError;
use assetdesk_tui::events::TuiEvent;
use assetdesk_tui::logging;
use assetdesk_tui::persistence;
use assetdesk_tui::state::{App, Effect, Screen};
use assetdesk_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = AppConfig::load()?;
    logging::init(&config.log_path)?;
    tracing::info!(api = %config.api_base_url, "starting assetdesk");

    let session = SessionStore::new();
    let api = HttpClient::new(&config.client_config(), session)?;
    let queries = QueryClient::new(config.query_config());

    let mut app = App::new(config, api, queries);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable saved state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.tick(Instant::now());
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event, &event_tx) {
                    break;
                }
            }
        }
    }

    if app.screen == Screen::Main {
        if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted()) {
            tracing::warn!(error = %err, "failed to save state");
        }
    }
    tracing::info!("assetdesk stopped");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Applies one event. Returns true when the app should exit.
fn handle_event(app: &mut App, event: TuiEvent, sender: &mpsc::Sender<TuiEvent>) -> bool {
    match event {
        TuiEvent::Input(key) => {
            let effect = app.handle_key(key);
            return run_effect(app, effect, sender);
        }
        TuiEvent::LoginFinished(result) => app.on_login_finished(result),
        TuiEvent::MutationFinished {
            ticket,
            mutation,
            result,
        } => app.on_mutation_finished(ticket, &mutation, result),
        TuiEvent::Resize { .. } => {}
        TuiEvent::Tick => app.tick(Instant::now()),
    }
    false
}

/// Spawns the request behind an effect; its outcome comes back as an event.
fn run_effect(app: &App, effect: Effect, sender: &mpsc::Sender<TuiEvent>) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::Login { email, password } => {
            let api = app.api.clone();
            let sender = sender.clone();
            tokio::spawn(async move {
                let result = api.auth().login(&email, &password).await;
                let _ = sender.send(TuiEvent::LoginFinished(result)).await;
            });
        }
        Effect::Mutate { ticket, mutation } => {
            let api = app.api.clone();
            let queries = app.queries.clone();
            let sender = sender.clone();
            tokio::spawn(async move {
                let result = mutation.run(&queries, &api).await;
                let _ = sender
                    .send(TuiEvent::MutationFinished {
                        ticket,
                        mutation,
                        result,
                    })
                    .await;
            });
        }
    }
    false
}
