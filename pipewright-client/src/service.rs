//! Raw pipeline-service API surface
//!
//! [`PipelineService`] mirrors the remote API one method per operation.
//! The production implementation is [`crate::HttpPipelineService`]; tests
//! substitute in-memory fakes so client-side policy can be exercised
//! without a running service.

use async_trait::async_trait;
use pipewright_core::domain::definition::PipelineObjectSpec;
use pipewright_core::dto::pipeline::{
    CreatePipelineRequest, CreatePipelineResponse, PipelineListing, PutOutcome, ValidationOutcome,
};

use crate::error::Result;

/// Operations exposed by the pipeline-orchestration service
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Registers a new, empty pipeline and returns its assigned identity
    async fn create(&self, request: CreatePipelineRequest) -> Result<CreatePipelineResponse>;

    /// Deletes a pipeline and everything scheduled under it
    async fn delete(&self, pipeline_id: &str) -> Result<()>;

    /// Fetches one page of the pipeline listing
    ///
    /// `marker` is the opaque cursor from the previous page, or `None` for
    /// the first page.
    async fn list(&self, marker: Option<&str>) -> Result<PipelineListing>;

    /// Checks a definition against a pipeline without committing it
    async fn validate(
        &self,
        pipeline_id: &str,
        objects: &[PipelineObjectSpec],
    ) -> Result<ValidationOutcome>;

    /// Commits a definition to a pipeline
    async fn put(&self, pipeline_id: &str, objects: &[PipelineObjectSpec]) -> Result<PutOutcome>;

    /// Starts executing the committed definition
    async fn activate(&self, pipeline_id: &str) -> Result<()>;
}
