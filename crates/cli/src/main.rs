use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use flowdash_api::{WorkflowApi, WorkflowClient, fetch_run_detail};
use flowdash_types::{CreateRunRequest, Route};
use flowdash_util::{ConfigOverrides, DashboardConfig, default_log_path};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flowdash", version)]
#[command(about = "Terminal dashboard for a workflow execution backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the workflow API (overrides FLOWDASH_API_BASE and the config file)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Fetch run jobs with a separate request (older backends)
    #[arg(long, global = true)]
    split_jobs: bool,

    /// Page to open the dashboard on, such as /workflows or /workflow/<id>
    #[arg(long, value_name = "PATH", default_value = "/")]
    route: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List workflow definitions
    Definitions,
    /// List workflow runs, newest first
    Runs,
    /// Show one run with its jobs
    Show {
        /// Run id
        id: String,
    },
    /// Start a run from a definition
    Run {
        /// Definition id
        definition_id: String,
        /// Input directory, relative to the storage root
        #[arg(long)]
        input_dir: String,
        /// Output directory, relative to the storage root
        #[arg(long)]
        output_dir: String,
    },
    /// Cancel a running run
    Cancel {
        /// Run id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    init_tracing(interactive)?;

    let overrides = ConfigOverrides {
        api_base: cli.api_base.clone(),
        split_jobs: cli.split_jobs,
    };
    let config = DashboardConfig::load(&overrides).context("failed to load configuration")?;
    debug!(api_base = %config.api_base, detail_fetch = ?config.detail_fetch, "configuration resolved");
    let client = WorkflowClient::new(&config.api_base).context("failed to create API client")?;

    // No subcommand => TUI
    let Some(command) = cli.command else {
        let route = Route::parse(&cli.route).ok_or_else(|| anyhow!("unknown route '{}'", cli.route))?;
        return flowdash_tui::run(Arc::new(client), config, route).await;
    };

    run_command(&client, &config, command).await
}

/// Installs the subscriber. While the TUI owns the terminal, output goes to a
/// log file; one-shot commands log to stderr.
fn init_tracing(interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(());
    }

    let path = default_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

async fn run_command(client: &WorkflowClient, config: &DashboardConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Definitions => print_json(&client.list_definitions().await?),
        Commands::Runs => {
            let mut runs = client.list_runs().await?;
            runs.sort_by(|left, right| right.created_at.cmp(&left.created_at));
            print_json(&runs)
        }
        Commands::Show { id } => print_json(&fetch_run_detail(client, &id, config.detail_fetch).await?),
        Commands::Run {
            definition_id,
            input_dir,
            output_dir,
        } => {
            let request = CreateRunRequest {
                workflow_definition_id: definition_id,
                input_dir,
                output_dir,
            };
            print_json(&client.create_run(&request).await?)
        }
        Commands::Cancel { id } => {
            client.cancel_run(&id).await?;
            print_json(&serde_json::json!({ "workflow_id": id, "cancel_requested": true }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_tui_on_the_given_route() {
        let cli = Cli::try_parse_from(["flowdash", "--route", "/workflow/42", "--split-jobs"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.split_jobs);
        assert_eq!(Route::parse(&cli.route), Some(Route::WorkflowDetail("42".into())));
    }

    #[test]
    fn run_requires_both_directories() {
        assert!(Cli::try_parse_from(["flowdash", "run", "3", "--input-dir", "in"]).is_err());
        let cli = Cli::try_parse_from(["flowdash", "run", "3", "--input-dir", "in", "--output-dir", "out"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Run { ref definition_id, .. }) if definition_id == "3"));
    }
}
