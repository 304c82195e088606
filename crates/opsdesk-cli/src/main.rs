//! Opsdesk CLI application
//!
//! Command-line interface and MCP server for the scanning-operations desk.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, OpsdeskMcpServer};
use opsdesk_core::{params::ListJobs, DeskBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        backfill,
        command,
    } = Args::parse();

    let mut builder = DeskBuilder::new();
    if let Some(path) = database_file {
        builder = builder.with_database_path(path);
    }
    if let Some(policy) = backfill {
        builder = builder.with_backfill_policy(policy.into());
    }
    let desk = builder.build().await.context("Failed to initialize desk")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!(
        "Opsdesk started with database {} ({} backfill)",
        desk.database_path().display(),
        desk.backfill_policy()
    );

    match command {
        Some(Workflow { command }) => {
            Cli::new(desk, renderer)
                .handle_workflow_command(command)
                .await
        }
        Some(Job { command }) => Cli::new(desk, renderer).handle_job_command(command).await,
        Some(Tech { command }) => Cli::new(desk, renderer).handle_tech_command(command).await,
        Some(Client { command }) => {
            Cli::new(desk, renderer)
                .handle_client_command(command)
                .await
        }
        Some(Form { command }) => Cli::new(desk, renderer).handle_form_command(command).await,
        Some(Serve) => {
            info!("Starting Opsdesk MCP server");
            run_stdio_server(OpsdeskMcpServer::new(desk))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(desk, renderer)
                .list_jobs(&ListJobs::default())
                .await
        }
    }
}
