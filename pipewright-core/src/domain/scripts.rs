//! Script staging mappings
//!
//! A deployment may carry supporting script files (ETL steps, bootstrap
//! shell, SQL) that must be staged in object storage before the pipeline
//! activates. The caller supplies one mapping per script per pipeline file.

use serde::{Deserialize, Serialize};

/// Maps one (pipeline file, script file) pair to its storage destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptMapping {
    /// File name of the pipeline this script belongs to, e.g. `p1-reports-7.json`
    pub pipeline: String,
    /// Script file name, located beneath the build artifact area
    pub script: String,
    /// Destination URL prefix, e.g. `s3://bucket/scripts/`
    pub destination: String,
}

impl ScriptMapping {
    pub fn new(
        pipeline: impl Into<String>,
        script: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            pipeline: pipeline.into(),
            script: script.into(),
            destination: destination.into(),
        }
    }

    /// Full destination URL for this script: the prefix joined with the
    /// script file name
    pub fn destination_url(&self) -> String {
        if self.destination.ends_with('/') {
            format!("{}{}", self.destination, self.script)
        } else {
            format!("{}/{}", self.destination, self.script)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_url_joins_with_single_slash() {
        let trailing = ScriptMapping::new("p1.json", "crunch.sql", "s3://bucket/scripts/");
        let bare = ScriptMapping::new("p1.json", "crunch.sql", "s3://bucket/scripts");

        assert_eq!(trailing.destination_url(), "s3://bucket/scripts/crunch.sql");
        assert_eq!(bare.destination_url(), "s3://bucket/scripts/crunch.sql");
    }
}
