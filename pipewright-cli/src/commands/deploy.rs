//! Deploy command handler
//!
//! Runs one deployment end to end: builds the deployment configuration
//! from the command line, wires up the service proxy and object store, and
//! renders the outcome. The process exits non-zero when the deployment
//! fails; the audit record has been written either way.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use pipewright_client::{HttpPipelineService, PipelineProxy};
use pipewright_core::domain::message::{Message, MessageLevel};
use pipewright_core::domain::scripts::ScriptMapping;
use pipewright_deploy::{DeployConfig, Deployer};
use pipewright_storage::{S3Config, S3ObjectStore};

use crate::config::Config;

/// Arguments of the deploy command
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the pipeline definition JSON file
    file: PathBuf,

    /// Root of the build artifact area, searched recursively for scripts
    #[arg(long, default_value = ".")]
    artifact_dir: PathBuf,

    /// Path of the append-only deployment report file
    #[arg(long, env = "PIPEWRIGHT_REPORT_FILE", default_value = "deployments.log")]
    report_file: PathBuf,

    /// Script mapping as SCRIPT=DESTINATION_PREFIX
    /// (e.g. crunch.sql=s3://bucket/scripts/); repeatable
    #[arg(long = "script", value_parser = parse_key_val)]
    scripts: Vec<(String, String)>,

    /// Deploying user recorded in the audit trail
    #[arg(long, env = "PIPEWRIGHT_USERNAME")]
    username: Option<String>,

    /// Region of the object storage backend
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// Custom S3-compatible endpoint (e.g. MinIO)
    #[arg(long, env = "PIPEWRIGHT_S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// Use path-style S3 addressing
    #[arg(long)]
    s3_path_style: bool,
}

/// Parse a single KEY=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid SCRIPT=DESTINATION: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Handle the deploy command
pub async fn handle_deploy_command(args: DeployArgs, config: &Config) -> Result<()> {
    let pipeline_file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("pipeline file path has no file name")?;

    // Every mapping on the command line belongs to the deployed file.
    let mappings = args
        .scripts
        .into_iter()
        .map(|(script, destination)| {
            ScriptMapping::new(pipeline_file_name.clone(), script, destination)
        })
        .collect();

    let deploy_config = DeployConfig {
        pipeline_file: args.file,
        artifact_dir: args.artifact_dir,
        report_file: args.report_file,
        mappings,
        username: args.username,
    };

    let service = HttpPipelineService::new(&config.service_url, config.api_token.clone());
    let proxy = PipelineProxy::new(Arc::new(service));

    let store = S3ObjectStore::new(S3Config {
        region: args.s3_region,
        endpoint: args.s3_endpoint,
        force_path_style: args.s3_path_style,
        ..Default::default()
    })
    .await
    .context("failed to initialize object storage")?;

    let outcome = Deployer::new(deploy_config, proxy, Arc::new(store))
        .run()
        .await;

    for message in &outcome.messages {
        print_message(message);
    }

    if outcome.success {
        println!(
            "{} pipeline {} deployed and activated",
            "✓".green().bold(),
            outcome.pipeline_id.bold()
        );
        Ok(())
    } else {
        match outcome.error {
            Some(error) => bail!("deployment failed: {error}"),
            None => bail!("deployment failed"),
        }
    }
}

fn print_message(message: &Message) {
    let prefix = message.level.prefix();
    let prefix = match message.level {
        MessageLevel::Info => prefix.normal(),
        MessageLevel::Warn => prefix.yellow(),
        MessageLevel::Error => prefix.red().bold(),
    };
    println!("{} {}", prefix, message.text);
}
