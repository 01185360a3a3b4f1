//! Deployment configuration
//!
//! One [`DeployConfig`] describes one deployment invocation: the pipeline
//! file to deploy, where the build left its artifacts, which scripts go
//! where, and where the audit trail lives.

use std::path::{Path, PathBuf};

use pipewright_core::domain::report::UNATTENDED_USERNAME;
use pipewright_core::domain::scripts::ScriptMapping;
use thiserror::Error;

/// Problems detected before any remote operation is attempted
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pipeline file {0} does not exist")]
    PipelineFileMissing(PathBuf),

    #[error("pipeline file {0} has no file name")]
    PipelineFileUnnamed(PathBuf),

    #[error("artifact directory {0} does not exist or is not a directory")]
    ArtifactDirMissing(PathBuf),

    #[error("report file path cannot be empty")]
    ReportPathEmpty,

    #[error("script mapping for \"{script}\" has an empty destination")]
    MappingWithoutDestination { script: String },
}

/// Everything one deployment run needs from its caller
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Path to the pipeline definition JSON file
    pub pipeline_file: PathBuf,

    /// Root of the build's artifact area, searched recursively for scripts
    pub artifact_dir: PathBuf,

    /// Path of the append-only deployment report file
    pub report_file: PathBuf,

    /// Script-to-destination mappings, across all pipeline files the caller
    /// knows about; the deployer picks out the ones for `pipeline_file`
    pub mappings: Vec<ScriptMapping>,

    /// Invoking user, when known
    pub username: Option<String>,
}

impl DeployConfig {
    /// Validates the configuration against the local filesystem
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pipeline_file.is_file() {
            return Err(ConfigError::PipelineFileMissing(self.pipeline_file.clone()));
        }
        self.pipeline_file_name()?;

        if !self.artifact_dir.is_dir() {
            return Err(ConfigError::ArtifactDirMissing(self.artifact_dir.clone()));
        }

        if self.report_file.as_os_str().is_empty() {
            return Err(ConfigError::ReportPathEmpty);
        }

        for mapping in &self.mappings {
            if mapping.destination.is_empty() {
                return Err(ConfigError::MappingWithoutDestination {
                    script: mapping.script.clone(),
                });
            }
        }

        Ok(())
    }

    /// The file-name component of the pipeline file, as used in mappings
    /// and naming
    pub fn pipeline_file_name(&self) -> Result<String, ConfigError> {
        Path::new(&self.pipeline_file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ConfigError::PipelineFileUnnamed(self.pipeline_file.clone()))
    }

    /// The username recorded in the audit trail
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(UNATTENDED_USERNAME)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn valid_config(dir: &Path) -> DeployConfig {
        let pipeline_file = dir.join("p1-reports-7.json");
        fs::write(&pipeline_file, r#"{ "objects": [] }"#).unwrap();
        DeployConfig {
            pipeline_file,
            artifact_dir: dir.to_path_buf(),
            report_file: dir.join("deployments.log"),
            mappings: vec![ScriptMapping::new(
                "p1-reports-7.json",
                "crunch.sql",
                "s3://bucket/scripts/",
            )],
            username: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(valid_config(dir.path()).validate().is_ok());
    }

    #[test]
    fn test_missing_pipeline_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.pipeline_file = dir.path().join("absent.json");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::PipelineFileMissing(_))
        ));
    }

    #[test]
    fn test_missing_artifact_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.artifact_dir = dir.path().join("no-such-dir");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArtifactDirMissing(_))
        ));
    }

    #[test]
    fn test_empty_mapping_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.mappings[0].destination = String::new();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MappingWithoutDestination { script }) if script == "crunch.sql"
        ));
    }

    #[test]
    fn test_username_falls_back_to_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        assert_eq!(config.username(), "SYSTEM");

        config.username = Some("jenkins".to_string());
        assert_eq!(config.username(), "jenkins");
    }
}
