use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use courtside::adapters::{HttpConnectivityMonitor, TerminalPlatform};
use courtside::config::ViewerConfig;
use courtside::domain::{
    BreakpointClassifier, GestureRecognizer, RefreshOutcome, Reload, ResilienceActions,
    ResilienceController,
};
use courtside::logging::init_logging;
use courtside::schedule::{ScheduleClient, ScheduleStore};
use courtside::terminal::{install_panic_hook, TerminalSession};
use courtside::view::{self, ViewModel};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Redraw cadence while idle, also drives the spinner.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Retry,
    Refresh,
    ClearError,
    Quit,
}

fn command_for(key: &KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char('r') => Some(Command::Retry),
        KeyCode::Char('f') => Some(Command::Refresh),
        KeyCode::Char('c') => Some(Command::ClearError),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("courtside {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;
    let config = ViewerConfig::from_env()?;
    let log_path = init_logging()?;
    info!("courtside {} starting, logging to {:?}", VERSION, log_path);

    install_panic_hook();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

/// Kick off a refresh without blocking the event loop.
fn spawn_refresh(actions: &ResilienceActions) {
    let actions = actions.clone();
    tokio::spawn(async move {
        if let RefreshOutcome::Failed(err) = actions.refresh().await {
            debug!("Refresh failed: {}", err);
        }
    });
}

/// First load of the view: shows the loading state, not the refresh marker.
async fn initial_load(actions: &ResilienceActions, loader: Arc<dyn Reload>) {
    actions.set_loading(true);
    match loader.reload().await {
        Ok(()) => actions.set_loading(false),
        Err(err) => {
            debug!("Initial load failed: {}", err);
            actions.set_error(err);
        }
    }
}

async fn run(config: ViewerConfig) -> Result<()> {
    let store = ScheduleStore::new();
    let client = ScheduleClient::new(config.schedule_url.clone(), config.request_timeout)?;
    let loader = store.loader(client);
    let resilience = config
        .resilience
        .clone()
        .with_retry_action(Arc::clone(&loader))
        .with_refresh_action(Arc::clone(&loader));

    let mut monitor =
        HttpConnectivityMonitor::new(config.health_url.clone(), config.request_timeout)?;
    monitor.start_polling(config.poll_interval);

    let mut session = TerminalSession::enter()?;
    let mut platform = TerminalPlatform::from_terminal(config.cell_width_px)?;
    let mut keys = platform.start();

    let mut controller = ResilienceController::mount(resilience, &monitor, &platform);
    let mut recognizer = GestureRecognizer::attach(Some(&platform));
    let mut classifier = BreakpointClassifier::observe(&platform);

    let actions = controller.actions().clone();
    {
        let actions = actions.clone();
        tokio::spawn(async move { initial_load(&actions, loader).await });
    }

    let result = event_loop(
        session.terminal(),
        &actions,
        &store,
        &recognizer,
        &classifier,
        &mut keys,
    )
    .await;

    controller.teardown();
    recognizer.detach();
    classifier.detach();
    platform.stop();
    monitor.stop_polling();
    session.restore();
    info!("courtside exiting");
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    actions: &ResilienceActions,
    store: &ScheduleStore,
    recognizer: &GestureRecognizer,
    classifier: &BreakpointClassifier,
    keys: &mut mpsc::UnboundedReceiver<KeyEvent>,
) -> Result<()> {
    let mut state_rx = actions.subscribe();
    let mut layout_rx = classifier.subscribe();
    let mut gesture_rx = recognizer.subscribe();
    let mut schedule_rx = store.subscribe();

    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick: usize = 0;

    loop {
        let state = state_rx.borrow_and_update().clone();
        let layout = *layout_rx.borrow_and_update();
        let gesture = *gesture_rx.borrow_and_update();
        let loaded = schedule_rx.borrow_and_update().clone();
        let model = ViewModel {
            resilience: &state,
            layout: &layout,
            gesture: &gesture,
            schedule: loaded.as_deref(),
            max_retries: actions.max_retries(),
            now: Utc::now(),
            tick,
        };
        terminal.draw(|f| view::render(f, &model))?;

        tokio::select! {
            _ = frames.tick() => {
                tick = tick.wrapping_add(1);
            }
            _ = state_rx.changed() => {}
            _ = layout_rx.changed() => {}
            _ = gesture_rx.changed() => {}
            _ = schedule_rx.changed() => {}
            key = keys.recv() => {
                let Some(key) = key else {
                    break;
                };
                match command_for(&key) {
                    Some(Command::Retry) => {
                        let outcome = actions.retry();
                        debug!("Retry requested: {:?}", outcome);
                    }
                    Some(Command::Refresh) => spawn_refresh(actions),
                    Some(Command::ClearError) => actions.clear_error(),
                    Some(Command::Quit) => break,
                    None => {}
                }
            }
        }
    }
    Ok(())
}
