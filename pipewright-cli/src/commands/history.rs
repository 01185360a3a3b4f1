//! History command handler
//!
//! Renders the deployment audit trail from the report file's latest
//! history line, newest attempt first.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Args;
use colored::*;
use pipewright_deploy::ReportWriter;

/// Arguments of the history command
#[derive(Args)]
pub struct HistoryArgs {
    /// Path of the deployment report file
    #[arg(long, env = "PIPEWRIGHT_REPORT_FILE", default_value = "deployments.log")]
    report_file: PathBuf,

    /// Show at most this many attempts
    #[arg(long)]
    limit: Option<usize>,
}

/// Handle the history command
pub async fn handle_history_command(args: HistoryArgs) -> Result<()> {
    let history = ReportWriter::new(&args.report_file)
        .history()
        .with_context(|| format!("failed to read {}", args.report_file.display()))?;

    if history.deployments.is_empty() {
        println!("No deployments recorded in {}", args.report_file.display());
        return Ok(());
    }

    let limit = args.limit.unwrap_or(history.deployments.len());

    for record in history.deployments.iter().rev().take(limit) {
        let status = if record.succeeded() {
            "SUCCESS".green()
        } else {
            "FAILED ".red()
        };
        let date = DateTime::from_timestamp_millis(record.date)
            .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| record.date.to_string());
        let pipeline_id = if record.pipeline_id.is_empty() {
            "-".to_string()
        } else {
            record.pipeline_id.clone()
        };

        println!(
            "{}  {}  {}  {}",
            status,
            date,
            pipeline_id.bold(),
            record.username.dimmed()
        );
    }

    Ok(())
}
