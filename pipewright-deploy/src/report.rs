//! Deployment report writer
//!
//! Appends one line per deployment attempt to a persistent report file.
//! Each line is a complete `{"deployments": [...]}` document carrying every
//! historical record plus the new one, so the latest line is always the
//! full history and any single line parses on its own. The file is never
//! truncated or rewritten.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use pipewright_core::domain::report::{DeploymentHistory, DeploymentRecord};
use tracing::debug;

/// Appends audit records to the report file
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends `record` as a new history line
    ///
    /// The new line carries the prior history plus `record`. A report file
    /// whose last line does not parse contributes nothing; the appended
    /// line then starts a fresh history while the unreadable lines stay in
    /// place.
    pub fn append(&self, record: DeploymentRecord) -> io::Result<()> {
        let mut history = self.history()?;
        history.deployments.push(record);

        let line = serde_json::to_string(&history).map_err(io::Error::other)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        debug!(path = %self.path.display(), records = history.deployments.len(), "report written");
        Ok(())
    }

    /// The history carried on the last parseable final line of the report
    /// file; empty when the file is missing or its last line is unreadable
    pub fn history(&self) -> io::Result<DeploymentHistory> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(DeploymentHistory::default());
            }
            Err(err) => return Err(err),
        };

        let history = contents
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str(line).ok())
            .unwrap_or_default();
        Ok(history)
    }
}
