//! Error types for the deployment core

use std::path::PathBuf;

use pipewright_client::ClientError;
use pipewright_core::domain::definition::DefinitionError;
use pipewright_storage::StorageError;
use thiserror::Error;

/// Failures of the script-staging phase
///
/// Any of these aborts the deployment; partial uploads are not rolled back.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A mapped script was not found anywhere beneath the artifact area
    #[error("script \"{script}\" not found under {artifact_dir}")]
    MissingScript {
        script: String,
        artifact_dir: PathBuf,
    },

    /// A located script could not be read
    #[error("could not read script {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An upload to object storage failed
    #[error("upload to {destination} failed: {source}")]
    UploadFailed {
        destination: String,
        source: StorageError,
    },
}

/// The deployment-fatal error union
///
/// Every variant terminates the attempt; nothing is retried by the core.
/// The audit record is still written whichever variant occurs.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The configuration did not survive its pre-flight checks
    #[error("invalid deployment configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The pipeline definition file could not be read
    #[error("could not read pipeline file: {0}")]
    Io(#[from] std::io::Error),

    /// The pipeline definition file did not parse
    #[error("malformed pipeline definition: {0}")]
    Definition(#[from] DefinitionError),

    /// A remote operation failed outright
    #[error("remote operation failed: {0}")]
    Remote(#[from] ClientError),

    /// The service reported blocking validation errors
    #[error("pipeline definition failed remote validation")]
    ValidationFailed,

    /// The service refused the committed definition without failing the call
    #[error("pipeline definition was rejected on put")]
    DefinitionRejected,

    /// Script staging failed
    #[error("script deployment failed: {0}")]
    Scripts(#[from] ScriptError),
}
