//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (alternate screen, raw mode, mouse capture).
//! - Drive a single event loop over input, ticks, and completed requests.
//! - Route input to the main view and execute the returned `Effect`s.
//!
//! Event loop strategy
//! - A dedicated OS thread blocks on `crossterm::event::read()` and forwards
//!   events over a Tokio channel.
//! - Pending requests are `JoinHandle`s in a `FuturesUnordered`; each
//!   resolved outcome becomes `Msg::ExecCompleted`.
//! - Ticking is fast (100 ms) while requests are in flight so the throbber
//!   animates, and slow (5 s) when idle.
//! - Effects are drained right after the event that produced them, including
//!   effects produced while entering a new route.

use std::io::Stdout;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flowdash_api::WorkflowApi;
use flowdash_types::{Effect, ExecOutcome, Msg, Route};
use flowdash_util::DashboardConfig;
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::task::{JoinError, JoinHandle};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::app::{App, SharedCtx};
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

type FlowdashTerminal = Terminal<CrosstermBackend<Stdout>>;
type PendingExecs = FuturesUnordered<JoinHandle<ExecOutcome>>;

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_millis(5000);
const MOUSE_MOVE_THROTTLE: Duration = Duration::from_millis(16);

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel. Mouse moves are throttled.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    thread::spawn(move || {
        let mut last_mouse_move = Instant::now();
        loop {
            match event::read() {
                Ok(event) => {
                    let is_mouse_move = event.as_mouse_event().is_some_and(|mouse| mouse.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < MOUSE_MOVE_THROTTLE {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<FlowdashTerminal> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut FlowdashTerminal) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).context("leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut FlowdashTerminal, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    app.rebuild_focus();
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Applies effects until none are left: navigation mounts the new view (whose
/// entry effects join the queue) and network effects are spawned.
///
/// Returns `false` once `Effect::Quit` is seen.
fn process_effects(app: &mut App, main_view: &mut MainView, mut effects: Vec<Effect>, pending: &mut PendingExecs) -> bool {
    while !effects.is_empty() {
        let batch = std::mem::take(&mut effects);
        if batch.contains(&Effect::Quit) {
            return false;
        }
        for effect in &batch {
            if let Effect::SwitchTo(route) = effect {
                effects.extend(main_view.set_current_route(app, route.clone()));
            }
        }
        let spawned = cmd::run_from_effects(app, &batch);
        if !spawned.is_empty() {
            debug!(count = spawned.len(), "spawned requests");
        }
        pending.extend(spawned);
    }
    true
}

/// A request task that panicked or was aborted has no outcome to deliver.
fn report_join_error(app: &mut App, error: JoinError) {
    warn!(%error, "request task failed");
    app.append_log_message(format!("Request task failed: {error}"));
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event loop
/// starting at `initial_route`, and restores the terminal on exit.
pub async fn run_app(api: Arc<dyn WorkflowApi>, config: DashboardConfig, initial_route: Route) -> Result<()> {
    let mut app = App::new(SharedCtx::new(api, &config));
    let mut main_view = MainView::default();
    let input_receiver = spawn_input_thread();

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &mut main_view, input_receiver, initial_route).await;
    let cleanup = cleanup_terminal(&mut terminal);
    result.and(cleanup)
}

async fn event_loop(
    terminal: &mut FlowdashTerminal,
    app: &mut App,
    main_view: &mut MainView,
    mut input_receiver: mpsc::Receiver<Event>,
    initial_route: Route,
) -> Result<()> {
    let mut pending_execs: PendingExecs = FuturesUnordered::new();
    process_effects(app, main_view, vec![Effect::SwitchTo(initial_route)], &mut pending_execs);

    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, main_view)?;

    loop {
        let target_interval = if app.executing { FAST_TICK } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let effects = tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(event) => handle_input_event(app, main_view, event),
                    // Input thread gone; shut down cleanly.
                    None => break,
                }
            }

            _ = ticker.tick() => main_view.handle_message(app, Msg::Tick),

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let effects = match joined {
                    Ok(outcome) => main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome))),
                    Err(error) => {
                        report_join_error(app, error);
                        Vec::new()
                    }
                };
                if pending_execs.is_empty() {
                    app.executing = false;
                    app.throbber_idx = 0;
                }
                effects
            }

            _ = signal::ctrl_c() => break,
        };

        if !process_effects(app, main_view, effects, &mut pending_execs) {
            break;
        }
        render(terminal, app, main_view)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use flowdash_types::CreateRunRequest;

    #[tokio::test]
    async fn navigation_effects_chain_into_route_entry_requests() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        let mut pending = PendingExecs::new();

        let keep_running = process_effects(&mut app, &mut main_view, vec![Effect::SwitchTo(Route::Workflows)], &mut pending);
        assert!(keep_running);
        assert_eq!(app.current_route, Route::Workflows);
        assert_eq!(pending.len(), 1);
        assert!(app.executing);

        let outcome = pending.next().await.expect("pending").expect("join");
        assert_eq!(outcome, ExecOutcome::RunsLoaded(Vec::new()));
    }

    #[tokio::test]
    async fn quit_stops_processing() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        let mut pending = PendingExecs::new();
        let effects = vec![
            Effect::CreateRun(CreateRunRequest {
                workflow_definition_id: "1".into(),
                input_dir: "a".into(),
                output_dir: "b".into(),
            }),
            Effect::Quit,
        ];
        assert!(!process_effects(&mut app, &mut main_view, effects, &mut pending));
        assert!(pending.is_empty());
    }
}
