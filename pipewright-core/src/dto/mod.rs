//! Data transfer objects for the pipeline-service API
//!
//! Wire types exchanged with the remote pipeline-orchestration service.
//! These mirror the service's JSON bodies exactly; the domain types in
//! [`crate::domain`] stay independent of them.

pub mod pipeline;
