//! Shared types for the Flowdash crates.
//!
//! Domain records for the workflow execution API live in [`model`]. This
//! module holds the message/effect vocabulary that connects the TUI state
//! machine with the effectful command layer.

pub mod model;

pub use model::{
    CreateRunRequest, CreateRunResponse, DetailFetchMode, Job, JobColor, JobState, RunDetail, RunStatus, WorkflowDefinition,
    WorkflowRun,
};

/// Top-level views addressable by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: workflow definitions.
    #[default]
    Home,
    /// `/workflows`: past and active runs.
    Workflows,
    /// `/workflow/:workflowId`: a single run and its jobs.
    WorkflowDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Workflows => "/workflows".to_string(),
            Self::WorkflowDetail(run_id) => format!("/workflow/{run_id}"),
        }
    }

    /// Parses a client-side path. Trailing slashes are ignored; unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        match normalized {
            "" => Some(Self::Home),
            "/workflows" => Some(Self::Workflows),
            _ => normalized
                .strip_prefix("/workflow/")
                .filter(|run_id| !run_id.is_empty() && !run_id.contains('/'))
                .map(|run_id| Self::WorkflowDetail(run_id.to_string())),
        }
    }
}

/// Remote operation an outcome belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    LoadDefinitions,
    CreateRun { definition_id: String },
    LoadRuns,
    LoadRunDetail { run_id: String },
    CancelRun { run_id: String },
}

impl Operation {
    pub fn describe(&self) -> String {
        match self {
            Self::LoadDefinitions => "load workflow definitions".to_string(),
            Self::CreateRun { definition_id } => format!("run workflow definition {definition_id}"),
            Self::LoadRuns => "load workflows".to_string(),
            Self::LoadRunDetail { run_id } => format!("load workflow {run_id}"),
            Self::CancelRun { run_id } => format!("cancel workflow {run_id}"),
        }
    }
}

/// Result of an asynchronous API call, delivered back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    DefinitionsLoaded(Vec<WorkflowDefinition>),
    RunCreated { definition_id: String, run_id: String },
    RunsLoaded(Vec<WorkflowRun>),
    /// Detail for the run requested as `run_id`.
    RunDetailLoaded { run_id: String, detail: RunDetail },
    /// The cancel call returned; the resulting state is only known after a reload.
    CancelAcknowledged { run_id: String },
    Failed { operation: Operation, message: String },
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbber)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Navigate to another view; the current view's state is discarded.
    SwitchTo(Route),
    LoadDefinitions,
    CreateRun(CreateRunRequest),
    LoadRuns,
    LoadRunDetail(String),
    CancelRun(String),
    /// Leave the application.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_paths_round_trip() {
        for route in [Route::Home, Route::Workflows, Route::WorkflowDetail("abc-1".into())] {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()));
        }
    }

    #[test]
    fn route_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/workflows/"), Some(Route::Workflows));
        assert_eq!(Route::parse("/workflow/"), None);
        assert_eq!(Route::parse("/workflow/a/jobs"), None);
        assert_eq!(Route::parse("/settings"), None);
    }
}
