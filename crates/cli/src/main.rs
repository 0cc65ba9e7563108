//! tfc-statesave entry point.
//!
//! This binary is the composition root. It:
//!
//! 1. Parses configuration from the environment ([`config::ServiceConfig`]).
//! 2. Wires observability (JSON `tracing` output, optional OTLP export).
//! 3. Constructs the AWS and Terraform Cloud adapters and injects them into
//!    the handlers ([`app::build`]).
//! 4. Runs the selected command:
//!    - `serve` (default): the webhook receiver.
//!    - `save`: one backup for a named workspace, without signature checks.
//!      This is the path used when the service is invoked directly by a
//!      trusted caller rather than by Terraform Cloud.

mod app;
mod config;
mod observability;

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use domain::{WorkspaceId, WorkspaceName, WorkspaceRef};
use handlers::StateSaver;
use tracing::{error, info};

use crate::config::ServiceConfig;

#[derive(Debug, Parser)]
#[command(name = "tfc-statesave", version, about = "Back up Terraform Cloud state files to S3")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the webhook receiver (default).
    Serve,
    /// Save the current state of one workspace and exit.
    Save {
        /// Terraform Cloud workspace ID, e.g. ws-abc123.
        #[arg(long)]
        workspace_id: String,
        /// Workspace name; used as the object key.
        #[arg(long)]
        workspace_name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match observability::init() {
        Ok(t) => t,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli).await;
    if let Err(err) = &result {
        error!("tfc-statesave failed: {err:#}");
    }

    telemetry.shutdown();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("Invalid configuration")?;
    let services = app::build(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let router = listener::webhook_router(services.dispatcher, config.invocation_timeout);
            listener::serve(config.listen_addr, router).await?;
        }
        Command::Save {
            workspace_id,
            workspace_name,
        } => {
            let workspace = WorkspaceRef::new(
                WorkspaceId::new(workspace_id).context("--workspace-id must not be empty")?,
                WorkspaceName::new(workspace_name)
                    .context("--workspace-name must not be empty")?,
            );
            let outcome = tokio::time::timeout(
                config.pipeline_timeout,
                services.backup.save(&workspace),
            )
            .await
            .context("State backup timed out")??;
            info!(outcome = %outcome.summary(), "Done");
        }
    }

    Ok(())
}
