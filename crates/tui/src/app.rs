//! Application state for the Flowdash TUI.
//!
//! [`App`] owns the shared context, the state of every view, the logs panel,
//! and the focus tree. Only the state of the active route is meaningful: the
//! main view resets a page's state each time its route is entered, so nothing
//! fetched survives navigation.

use std::sync::Arc;

use flowdash_api::WorkflowApi;
use flowdash_types::{DetailFetchMode, ExecOutcome, Msg, Route};
use flowdash_util::DashboardConfig;
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::ui::components::definitions::DefinitionsState;
use crate::ui::components::header::HeaderState;
use crate::ui::components::logs::LogsState;
use crate::ui::components::run_detail::RunDetailState;
use crate::ui::components::runs::RunsState;
use crate::ui::theme::{self, Theme};

/// Frames of the header throbber shown while requests are in flight.
pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Cross-cutting context shared by every component.
#[derive(Debug)]
pub struct SharedCtx {
    /// Remote workflow API
    pub api: Arc<dyn WorkflowApi>,
    /// Active color theme
    pub theme: Box<dyn Theme>,
    /// Request shape used by the run detail view
    pub detail_fetch: DetailFetchMode,
    /// Target of the header's sign-out link
    pub sign_out_url: String,
}

impl SharedCtx {
    pub fn new(api: Arc<dyn WorkflowApi>, config: &DashboardConfig) -> Self {
        Self {
            api,
            theme: theme::load(&config.theme),
            detail_fetch: config.detail_fetch,
            sign_out_url: config.sign_out_url(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    /// Shared, cross-cutting context (API, theme, config)
    pub ctx: SharedCtx,
    /// Route of the mounted content view
    pub current_route: Route,
    pub header: HeaderState,
    pub definitions: DefinitionsState,
    pub runs: RunsState,
    pub run_detail: RunDetailState,
    /// In-app log panel
    pub logs: LogsState,
    /// Focus tree, rebuilt before each render
    pub focus: Focus,
    /// Whether any request is in flight
    pub executing: bool,
    /// Animation frame for the execution throbber
    pub throbber_idx: usize,
    container_focus: FocusFlag,
}

impl App {
    pub fn new(ctx: SharedCtx) -> Self {
        let mut app = Self {
            ctx,
            current_route: Route::default(),
            header: HeaderState::default(),
            definitions: DefinitionsState::new(),
            runs: RunsState::new(),
            run_detail: RunDetailState::new(String::new()),
            logs: LogsState::default(),
            focus: Focus::default(),
            executing: false,
            throbber_idx: 0,
            container_focus: FocusFlag::named("root"),
        };
        app.focus = FocusBuilder::build_for(&app);
        app
    }

    /// Applies app-wide reactions to a message. View-specific handling lives
    /// in the mounted component.
    pub fn update(&mut self, msg: &Msg) {
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                }
            }
            Msg::Resize(..) => {}
            Msg::ExecCompleted(outcome) => self.log_outcome(outcome),
        }
    }

    fn log_outcome(&mut self, outcome: &ExecOutcome) {
        match outcome {
            ExecOutcome::Failed { operation, message } => {
                warn!(operation = %operation.describe(), error = %message, "request failed");
                self.logs.append(format!("Failed to {}: {message}", operation.describe()));
            }
            ExecOutcome::RunCreated { definition_id, run_id } => {
                info!(definition_id = %definition_id, run_id = %run_id, "workflow run created");
                self.logs.append(format!("Started workflow {run_id} from definition {definition_id}"));
            }
            ExecOutcome::CancelAcknowledged { run_id } => {
                info!(run_id = %run_id, "cancel acknowledged");
                self.logs.append(format!("Cancel requested for workflow {run_id}"));
            }
            _ => {}
        }
    }

    /// Appends a user-facing line to the logs panel.
    pub fn append_log_message(&mut self, message: impl Into<String>) {
        self.logs.append(message.into());
    }

    /// True while a text field owns the keyboard, so global shortcut keys
    /// must be passed through as input.
    pub fn is_editing_text(&self) -> bool {
        matches!(self.current_route, Route::Home) && self.definitions.is_editing()
    }

    /// Rebuilds the focus tree after a structural change, keeping the
    /// current focus where the widget still exists.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = FocusBuilder::rebuild_for(self, Some(old_focus));
        if self.focus.focused().is_none() {
            self.focus.first();
        }
    }

    pub fn throbber(&self) -> Option<&'static str> {
        self.executing.then(|| THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()])
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        match self.current_route {
            Route::Home => builder.widget(&self.definitions),
            Route::Workflows => builder.widget(&self.runs),
            Route::WorkflowDetail(_) => builder.widget(&self.run_detail),
        };
        if self.logs.is_visible {
            builder.widget(&self.logs);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use flowdash_types::Operation;

    #[test]
    fn failures_reach_the_logs_panel() {
        let mut app = test_app();
        let before = app.logs.len();
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Failed {
            operation: Operation::LoadRuns,
            message: "timed out".into(),
        })));
        assert_eq!(app.logs.len(), before + 1);
        assert_eq!(app.logs.latest(), Some("Failed to load workflows: timed out"));
    }

    #[test]
    fn throbber_only_advances_while_executing() {
        let mut app = test_app();
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 0);
        assert_eq!(app.throbber(), None);
        app.executing = true;
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 1);
        assert_eq!(app.throbber(), Some(THROBBER_FRAMES[1]));
    }
}
