//! Pipewright CLI
//!
//! Command-line interface for deploying pipeline definitions and
//! inspecting the deployment audit trail.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipewright")]
#[command(about = "Deploys data-pipeline definitions to the orchestration service", long_about = None)]
struct Cli {
    /// Pipeline-orchestration service URL
    #[arg(
        long,
        env = "PIPEWRIGHT_SERVICE_URL",
        default_value = "http://localhost:3000"
    )]
    service_url: String,

    /// Bearer token for the pipeline service
    #[arg(long, env = "PIPEWRIGHT_API_TOKEN")]
    api_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Live diagnostics stay quiet unless opted into; the deploy command
    // prints the full message sequence itself.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewright_deploy=warn,pipewright_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        service_url: cli.service_url,
        api_token: cli.api_token,
    };

    handle_command(cli.command, &config).await
}
