//! Error types for registry-client

use thiserror::Error;

/// Errors that can occur while talking to the external services
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Registry has no package with this exact identifier
    #[error("Package not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Configured base URL cannot be used
    #[error("Invalid service URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Package identifier is empty
    #[error("Package identifier must not be empty")]
    EmptyPackageId,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}
