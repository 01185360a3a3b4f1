//! # Pipewright Deploy
//!
//! The deployment core: a single-pass state machine that replaces one
//! pipeline on the remote orchestration service with a freshly validated
//! definition, stages its scripts in object storage, and leaves an
//! auditable record behind.
//!
//! Architecture:
//! - Configuration: [`DeployConfig`] describes one deployment invocation
//! - Message log: [`MessageLog`] accumulates ordered, leveled diagnostics
//! - Script deployer: [`ScriptDeployer`] stages script files in object storage
//! - Report writer: [`ReportWriter`] appends the audit trail
//! - Deployer: [`Deployer`] drives the states end to end and produces a
//!   [`DeploymentOutcome`]
//!
//! Every state is guarded by the previous one's success; the only failure
//! recovered locally is removal of the stale pipeline, which is best-effort
//! by design. Whatever state the run terminates in, exactly one audit
//! record is written.

pub mod config;
pub mod deployer;
pub mod error;
pub mod log;
pub mod naming;
pub mod report;
pub mod scripts;

pub use config::{ConfigError, DeployConfig};
pub use deployer::{Deployer, DeploymentOutcome};
pub use error::{DeployError, ScriptError};
pub use log::MessageLog;
pub use report::ReportWriter;
pub use scripts::{ScriptDeployer, StagedScript};
