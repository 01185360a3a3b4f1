//! Script deployer
//!
//! Stages a pipeline's supporting scripts in object storage before the
//! pipeline activates. Staging is two-phase: every relevant script is
//! located and read first, sequentially, so a missing file aborts with
//! zero storage writes; the uploads then run through a bounded worker
//! pool. Nothing is in flight when `deploy` returns, and partial uploads
//! are never rolled back.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, TryStreamExt};
use pipewright_core::domain::scripts::ScriptMapping;
use pipewright_storage::ObjectStore;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ScriptError;

/// Upload parallelism across distinct mappings
const MAX_CONCURRENT_UPLOADS: usize = 4;

const SCRIPT_CONTENT_TYPE: &str = "application/octet-stream";

/// One successfully staged script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedScript {
    pub script: String,
    pub destination: String,
}

struct LocatedScript {
    script: String,
    destination: String,
    bytes: Bytes,
}

/// Uploads mapped script files from the artifact area to object storage
pub struct ScriptDeployer {
    store: Arc<dyn ObjectStore>,
    artifact_dir: PathBuf,
}

impl ScriptDeployer {
    pub fn new(store: Arc<dyn ObjectStore>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            artifact_dir: artifact_dir.into(),
        }
    }

    /// Stages every script mapped to `pipeline_file`
    ///
    /// Mappings for other pipeline files are ignored. Returns the staged
    /// scripts in mapping order.
    ///
    /// # Errors
    /// [`ScriptError`] on the first missing file, unreadable file, or
    /// failed upload.
    pub async fn deploy(
        &self,
        pipeline_file: &str,
        mappings: &[ScriptMapping],
    ) -> Result<Vec<StagedScript>, ScriptError> {
        let relevant: Vec<&ScriptMapping> = mappings
            .iter()
            .filter(|mapping| mapping.pipeline == pipeline_file)
            .collect();

        let located = self.locate_all(&relevant)?;

        stream::iter(located.iter().map(Ok::<_, ScriptError>))
            .try_for_each_concurrent(MAX_CONCURRENT_UPLOADS, |script| {
                let store = Arc::clone(&self.store);
                async move {
                    store
                        .put_object(&script.destination, script.bytes.clone(), SCRIPT_CONTENT_TYPE)
                        .await
                        .map_err(|source| ScriptError::UploadFailed {
                            destination: script.destination.clone(),
                            source,
                        })
                }
            })
            .await?;

        Ok(located
            .into_iter()
            .map(|script| StagedScript {
                script: script.script,
                destination: script.destination,
            })
            .collect())
    }

    /// Resolves and reads every mapped script before any upload starts
    fn locate_all(&self, mappings: &[&ScriptMapping]) -> Result<Vec<LocatedScript>, ScriptError> {
        let mut located = Vec::with_capacity(mappings.len());

        for mapping in mappings {
            let path =
                self.find_script(&mapping.script)
                    .ok_or_else(|| ScriptError::MissingScript {
                        script: mapping.script.clone(),
                        artifact_dir: self.artifact_dir.clone(),
                    })?;

            debug!(script = %mapping.script, path = %path.display(), "located script");

            let bytes = std::fs::read(&path)
                .map(Bytes::from)
                .map_err(|source| ScriptError::ReadFailed { path, source })?;

            located.push(LocatedScript {
                script: mapping.script.clone(),
                destination: mapping.destination_url(),
                bytes,
            });
        }

        Ok(located)
    }

    /// First file named `script` beneath the artifact area, walking in
    /// sorted order so repeated builds resolve the same file
    fn find_script(&self, script: &str) -> Option<PathBuf> {
        WalkDir::new(&self.artifact_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| entry.file_name().to_string_lossy() == script)
            .map(|entry| entry.into_path())
    }
}
