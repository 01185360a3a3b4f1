//! CLI configuration

/// Connection settings shared by all commands
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the pipeline-orchestration service
    pub service_url: String,
    /// Optional bearer token sent with every service request
    pub api_token: Option<String>,
}
