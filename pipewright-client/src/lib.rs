//! # Pipewright Client
//!
//! HTTP client library for communicating with the pipeline-orchestration
//! service API.
//!
//! The crate is layered in two:
//!
//! - [`PipelineService`] is the raw API surface, one method per remote
//!   operation, with [`HttpPipelineService`] as the production
//!   implementation.
//! - [`PipelineProxy`] is the facade the deployment workflow drives. It
//!   owns the client-side policy: fresh idempotency tokens on create,
//!   best-effort removal, ordered flattening of validation messages and
//!   paginated lookup by name pattern.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pipewright_client::{HttpPipelineService, PipelineProxy};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = HttpPipelineService::new("http://localhost:3000", None);
//! let proxy = PipelineProxy::new(Arc::new(service));
//!
//! let existing = proxy.find_pipeline_id(r"p1-reports-\d+").await?;
//! if !existing.is_empty() {
//!     proxy.remove_pipeline(&existing).await;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http;
mod proxy;
mod service;

pub use error::{ClientError, Result};
pub use http::HttpPipelineService;
pub use proxy::{PipelineProxy, ValidationReport};
pub use service::PipelineService;
