//! Sakila TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sakila_tui::api_client::RestClient;
use sakila_tui::config::TuiConfig;
use sakila_tui::error::TuiError;
use sakila_tui::events::TuiEvent;
use sakila_tui::keys::map_key;
use sakila_tui::persistence::{self, PersistedState};
use sakila_tui::state::App;
use sakila_tui::telemetry;
use sakila_tui::views::render_view;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    telemetry::init_logging(&config.log_path)?;
    info!("Starting Sakila TUI");

    let api = RestClient::new(&config)?;
    info!(base_url = api.base_url(), "Backend client ready");
    let mut app = App::new(config, Arc::new(api));

    let start_view = persistence::restore_view(&app.config.persistence_path, app.active_view);

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    app.enter_view(start_view).await;

    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            // Redraw so expired notifications leave the footer.
            _ = ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event).await {
                    break;
                }
            }
        }
    }

    let persisted = PersistedState::capture(&app);
    if let Err(err) = persistence::save(&app.config.persistence_path, &persisted) {
        warn!(error = %err, "Failed to save UI state");
    }
    info!("Sakila TUI exited");

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
                    CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
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

/// Returns `true` when the app should exit.
async fn handle_event(app: &mut App, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => match map_key(key, app.input_mode()) {
            Some(action) => app.handle_action(action).await,
            None => false,
        },
        TuiEvent::Resize { .. } => false,
    }
}
