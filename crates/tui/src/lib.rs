//! # Flowdash TUI Library
//!
//! Terminal dashboard for a workflow execution backend, built on Ratatui.
//!
//! ## Views
//!
//! - `/` lists workflow definitions and starts runs from them
//! - `/workflows` lists every run, newest first
//! - `/workflow/:id` shows one run with its jobs, logs, and a cancel action
//!
//! ## Architecture
//!
//! Each view is a component that handles input and renders itself, with its
//! state kept on [`app::App`]. Components never call the network; they return
//! effects which the command layer turns into spawned requests. Completed
//! requests come back to the mounted view as messages.

mod app;
mod cmd;
mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use flowdash_api::WorkflowApi;
use flowdash_types::Route;
use flowdash_util::DashboardConfig;

/// Runs the dashboard until the user quits.
///
/// Sets up the terminal, opens `initial_route`, and runs the event loop.
///
/// # Errors
///
/// Only terminal setup and teardown failures are returned. Request failures
/// are shown in the UI and never end the session.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use flowdash_api::WorkflowClient;
/// use flowdash_types::Route;
/// use flowdash_util::DashboardConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = DashboardConfig::default();
///     let client = WorkflowClient::new(&config.api_base)?;
///     flowdash_tui::run(Arc::new(client), config, Route::Home).await
/// }
/// ```
pub async fn run(api: Arc<dyn WorkflowApi>, config: DashboardConfig, initial_route: Route) -> Result<()> {
    ui::runtime::run_app(api, config, initial_route).await
}
