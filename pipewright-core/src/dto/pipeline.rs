//! Pipeline-service wire types

use serde::{Deserialize, Serialize};

use crate::domain::definition::PipelineObjectSpec;

/// Request to create a new, still-empty pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipelineRequest {
    pub name: String,
    pub description: String,
    /// Caller-chosen idempotency token; the service deduplicates creates on it
    pub unique_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipelineResponse {
    pub pipeline_id: String,
}

/// Identifier plus display name of a pipeline known to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineHandle {
    pub id: String,
    pub name: String,
}

impl PipelineHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One page of a pipeline listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineListing {
    pub entries: Vec<PipelineHandle>,
    /// True when further pages exist beyond this one
    #[serde(default)]
    pub has_more: bool,
    /// Continuation cursor for the next page, present when `has_more`
    #[serde(default)]
    pub next_marker: Option<String>,
}

/// Body of validate and put calls: the full ordered object list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionPayload {
    pub objects: Vec<PipelineObjectSpec>,
}

/// Validation messages grouped by the object they concern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationGroup {
    /// Object id the messages apply to, when the service attributes them
    #[serde(default)]
    pub id: Option<String>,
    pub messages: Vec<String>,
}

impl ValidationGroup {
    pub fn new<I, S>(id: Option<&str>, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.map(str::to_string),
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Remote outcome of a validate call
///
/// `errored` alone decides whether the definition is blocked; the message
/// lists are advisory and may be non-empty either way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(default)]
    pub validation_errors: Vec<ValidationGroup>,
    #[serde(default)]
    pub validation_warnings: Vec<ValidationGroup>,
    pub errored: bool,
}

/// Remote outcome of a put call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PutOutcome {
    pub errored: bool,
}
