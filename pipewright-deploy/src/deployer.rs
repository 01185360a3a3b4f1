//! Deployment orchestrator
//!
//! [`Deployer`] drives one deployment through its fixed state sequence:
//! parse the definition, locate and retire the previous pipeline, create
//! and validate the new one, stage scripts, commit the definition,
//! activate, and finally write the audit record. Each state is guarded by
//! the previous one's success; retirement is the only best-effort state.
//!
//! There is no rollback. A run that fails after retirement has already
//! deleted the previous pipeline, and a run that fails after creation
//! leaves the new pipeline allocated remotely. Both windows are accepted
//! and visible in the message log and audit trail.

use std::sync::Arc;

use chrono::Utc;
use pipewright_client::PipelineProxy;
use pipewright_core::domain::definition::PipelineDefinition;
use pipewright_core::domain::message::Message;
use pipewright_core::domain::report::DeploymentRecord;
use pipewright_storage::ObjectStore;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::log::MessageLog;
use crate::naming;
use crate::report::ReportWriter;
use crate::scripts::ScriptDeployer;

/// Everything one deployment run hands back to its caller
#[derive(Debug)]
pub struct DeploymentOutcome {
    pub success: bool,
    /// Remote id of the created pipeline; empty when creation never
    /// succeeded
    pub pipeline_id: String,
    /// Every message the run produced, in order
    pub messages: Vec<Message>,
    /// The fatal error that terminated the run, when it failed
    pub error: Option<DeployError>,
}

/// One-shot deployment state machine
pub struct Deployer {
    config: DeployConfig,
    proxy: PipelineProxy,
    scripts: ScriptDeployer,
    reporter: ReportWriter,
}

impl Deployer {
    pub fn new(config: DeployConfig, proxy: PipelineProxy, store: Arc<dyn ObjectStore>) -> Self {
        let scripts = ScriptDeployer::new(store, config.artifact_dir.clone());
        let reporter = ReportWriter::new(config.report_file.clone());
        Self {
            config,
            proxy,
            scripts,
            reporter,
        }
    }

    /// Runs the deployment to completion and reports the outcome
    ///
    /// Never returns an error: failures terminate the state sequence, are
    /// appended to the message log as the final ERROR entry, and come back
    /// inside the outcome. The audit record is written whichever way the
    /// run ends; a record write failure is itself only a WARN.
    pub async fn run(self) -> DeploymentOutcome {
        let mut log = MessageLog::new();
        let mut pipeline_id = String::new();

        let error = match self.execute(&mut log, &mut pipeline_id).await {
            Ok(()) => None,
            Err(err) => {
                log.error(format!("deployment failed: {err}"));
                Some(err)
            }
        };
        let success = error.is_none();

        let record =
            DeploymentRecord::new(Utc::now(), self.config.username(), success, pipeline_id.clone());
        if let Err(err) = self.reporter.append(record) {
            log.warn(format!("could not write deployment report: {err}"));
        }

        DeploymentOutcome {
            success,
            pipeline_id,
            messages: log.into_messages(),
            error,
        }
    }

    /// The guarded state sequence, through activation
    ///
    /// `pipeline_id` is written as soon as creation succeeds so the audit
    /// record names the new pipeline even when a later state fails.
    async fn execute(
        &self,
        log: &mut MessageLog,
        pipeline_id: &mut String,
    ) -> Result<(), DeployError> {
        self.config.validate()?;
        let file_name = self.config.pipeline_file_name()?;

        // Parse
        let source = tokio::fs::read_to_string(&self.config.pipeline_file).await?;
        let definition = PipelineDefinition::parse(&source)?;
        log.info(format!(
            "parsed {} pipeline objects from {file_name}",
            definition.len()
        ));

        // Locate
        let pattern = naming::retirement_pattern(&file_name);
        let old_id = self.proxy.find_pipeline_id(&pattern).await?;

        // Retire, best-effort
        if old_id.is_empty() {
            log.info(format!("no existing pipeline matches \"{pattern}\""));
        } else if self.proxy.remove_pipeline(&old_id).await {
            log.info(format!("removed previous pipeline {old_id}"));
        } else {
            log.warn(format!(
                "could not remove previous pipeline {old_id}; continuing"
            ));
        }

        // Create
        let name = naming::pipeline_name(&file_name);
        let description = format!("{file_name} deployed by {}", self.config.username());
        *pipeline_id = self.proxy.create_pipeline(&name, &description).await?;
        log.info(format!("created pipeline {pipeline_id} ({name})"));

        // Validate: errors surface before warnings, both in remote order
        let report = self
            .proxy
            .validate_definition(pipeline_id, definition.objects())
            .await?;
        for error in &report.errors {
            log.error(error.as_str());
        }
        for warning in &report.warnings {
            log.warn(warning.as_str());
        }
        if report.errored {
            return Err(DeployError::ValidationFailed);
        }

        // Stage scripts before activation, so activation never starts
        // against a pipeline whose scripts are not in place
        let staged = self.scripts.deploy(&file_name, &self.config.mappings).await?;
        for script in &staged {
            log.info(format!("staged {} at {}", script.script, script.destination));
        }

        // Commit
        if !self
            .proxy
            .put_definition(pipeline_id, definition.objects())
            .await?
        {
            return Err(DeployError::DefinitionRejected);
        }
        log.info(format!("committed definition to {pipeline_id}"));

        // Activate
        self.proxy.activate(pipeline_id).await?;
        log.info(format!("activated pipeline {pipeline_id}"));

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
