//! Deployment audit records
//!
//! Every deployment attempt, successful or not, appends one record to a
//! persistent report file. The file is a sequence of JSON lines; each line
//! is a complete [`DeploymentHistory`] document carrying all records up to
//! that point, so the latest line always holds the full history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Username recorded when no invoking user is known
pub const UNATTENDED_USERNAME: &str = "SYSTEM";

/// One audited deployment attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Epoch milliseconds of the attempt
    pub date: i64,
    pub username: String,
    /// Literal `"true"` or `"false"`
    pub status: String,
    /// Remote id of the created pipeline; empty when creation never succeeded
    #[serde(rename = "pipelineId")]
    pub pipeline_id: String,
}

impl DeploymentRecord {
    pub fn new(
        date: DateTime<Utc>,
        username: impl Into<String>,
        success: bool,
        pipeline_id: impl Into<String>,
    ) -> Self {
        Self {
            date: date.timestamp_millis(),
            username: username.into(),
            status: success.to_string(),
            pipeline_id: pipeline_id.into(),
        }
    }

    /// Whether this record marks a successful deployment
    pub fn succeeded(&self) -> bool {
        self.status == "true"
    }
}

/// The full deployment history carried on each line of the report file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentHistory {
    pub deployments: Vec<DeploymentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_spec_field_names() {
        let date = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let record = DeploymentRecord::new(date, UNATTENDED_USERNAME, true, "test-1234");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], 1_700_000_000_000_i64);
        assert_eq!(json["username"], "SYSTEM");
        assert_eq!(json["status"], "true");
        assert_eq!(json["pipelineId"], "test-1234");
    }

    #[test]
    fn test_status_is_a_literal_string() {
        let date = Utc::now();
        let failed = DeploymentRecord::new(date, "jenkins", false, "");

        assert_eq!(failed.status, "false");
        assert!(!failed.succeeded());
        assert!(DeploymentRecord::new(date, "jenkins", true, "df-1").succeeded());
    }

    #[test]
    fn test_history_round_trips() {
        let history = DeploymentHistory {
            deployments: vec![DeploymentRecord::new(Utc::now(), "ci", true, "df-42")],
        };

        let line = serde_json::to_string(&history).unwrap();
        let parsed: DeploymentHistory = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.deployments, history.deployments);
    }
}
