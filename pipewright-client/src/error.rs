//! Error types for the pipeline-service client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when communicating with the pipeline service
///
/// Every failure mode of a remote operation surfaces as one of these
/// variants. Callers that do not care about the cause can treat the type
/// as a single remote-operation failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A pipeline name pattern failed to compile
    #[error("Invalid pipeline name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ClientError {
    /// Returns true if this is a 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::ApiError { status: 404, .. })
    }
}
