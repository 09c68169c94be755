//! # Command Execution Layer
//!
//! Translates the [`Effect`]s produced by components into [`Cmd`]s and runs
//! them against the workflow API. This is the boundary between the pure
//! state handling of the app and network I/O:
//!
//! - [`from_effects`] keeps the effects that need the network and turns them
//!   into commands. Navigation and quitting are handled by the runtime.
//! - [`run_cmds`] spawns one task per command and hands the join handles back
//!   to the runtime, which feeds each [`ExecOutcome`] into the app as a
//!   message once it resolves.
//!
//! Commands never touch app state directly. Every failure is reported as
//! [`ExecOutcome::Failed`] so the owning view decides how to recover.

use std::sync::Arc;

use flowdash_api::{ApiError, WorkflowApi, fetch_run_detail};
use flowdash_types::{CreateRunRequest, DetailFetchMode, Effect, ExecOutcome, Operation};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::App;

/// A network request derived from an [`Effect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    LoadDefinitions,
    CreateRun(CreateRunRequest),
    LoadRuns,
    LoadRunDetail(String),
    CancelRun(String),
}

impl Cmd {
    fn operation(&self) -> Operation {
        match self {
            Cmd::LoadDefinitions => Operation::LoadDefinitions,
            Cmd::CreateRun(request) => Operation::CreateRun {
                definition_id: request.workflow_definition_id.clone(),
            },
            Cmd::LoadRuns => Operation::LoadRuns,
            Cmd::LoadRunDetail(run_id) => Operation::LoadRunDetail { run_id: run_id.clone() },
            Cmd::CancelRun(run_id) => Operation::CancelRun { run_id: run_id.clone() },
        }
    }
}

/// Convert effects into commands, skipping effects the runtime owns.
pub fn from_effects(effects: &[Effect]) -> Vec<Cmd> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::LoadDefinitions => Some(Cmd::LoadDefinitions),
            Effect::CreateRun(request) => Some(Cmd::CreateRun(request.clone())),
            Effect::LoadRuns => Some(Cmd::LoadRuns),
            Effect::LoadRunDetail(run_id) => Some(Cmd::LoadRunDetail(run_id.clone())),
            Effect::CancelRun(run_id) => Some(Cmd::CancelRun(run_id.clone())),
            Effect::SwitchTo(_) | Effect::Quit => None,
        })
        .collect()
}

/// Spawn every command on the tokio runtime.
///
/// Marks the app as executing when anything was spawned; the runtime clears
/// the flag once all pending handles have resolved.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) -> Vec<JoinHandle<ExecOutcome>> {
    if commands.is_empty() {
        return Vec::new();
    }
    app.executing = true;
    commands
        .into_iter()
        .map(|command| {
            let api = Arc::clone(&app.ctx.api);
            let mode = app.ctx.detail_fetch;
            tokio::spawn(async move { execute(api.as_ref(), mode, command).await })
        })
        .collect()
}

/// Shorthand for [`from_effects`] followed by [`run_cmds`].
pub fn run_from_effects(app: &mut App, effects: &[Effect]) -> Vec<JoinHandle<ExecOutcome>> {
    let commands = from_effects(effects);
    run_cmds(app, commands)
}

/// Performs one command and folds the result into an [`ExecOutcome`].
pub async fn execute(api: &dyn WorkflowApi, mode: DetailFetchMode, command: Cmd) -> ExecOutcome {
    let operation = command.operation();
    debug!(operation = %operation.describe(), "executing command");
    let result: Result<ExecOutcome, ApiError> = match command {
        Cmd::LoadDefinitions => api.list_definitions().await.map(ExecOutcome::DefinitionsLoaded),
        Cmd::CreateRun(request) => api.create_run(&request).await.map(|response| ExecOutcome::RunCreated {
            definition_id: request.workflow_definition_id,
            run_id: response.workflow_id,
        }),
        Cmd::LoadRuns => api.list_runs().await.map(ExecOutcome::RunsLoaded),
        Cmd::LoadRunDetail(run_id) => fetch_run_detail(api, &run_id, mode)
            .await
            .map(|detail| ExecOutcome::RunDetailLoaded { run_id, detail }),
        Cmd::CancelRun(run_id) => api
            .cancel_run(&run_id)
            .await
            .map(|()| ExecOutcome::CancelAcknowledged { run_id }),
    };
    result.unwrap_or_else(|error| ExecOutcome::Failed {
        operation,
        message: error.to_string(),
    })
}
