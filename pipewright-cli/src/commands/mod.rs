//! Commands module
//!
//! Defines the CLI commands and routes them to their handlers.

mod deploy;
mod history;

pub use deploy::DeployArgs;
pub use history::HistoryArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a pipeline definition, replacing its previous deployment
    Deploy(DeployArgs),
    /// Show the deployment audit trail
    History(HistoryArgs),
}

/// Handle a CLI command
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Deploy(args) => deploy::handle_deploy_command(args, config).await,
        Commands::History(args) => history::handle_history_command(args).await,
    }
}
