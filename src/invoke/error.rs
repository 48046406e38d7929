// Error types for Invoke module
// These never leave the adapter; they are folded into RawResult

use crate::locator::LocateError;
use thiserror::Error;

/// Invocation errors
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("Failed to launch '{interpreter}': {source}")]
    SpawnFailed {
        interpreter: String,
        source: std::io::Error,
    },

    #[error("Failed while waiting for the tool: {0}")]
    WaitFailed(std::io::Error),

    #[error("Failed to read source file: {0}")]
    SourceUnreadable(std::io::Error),

    #[error("Failed to create HTTP client: {0}")]
    ClientError(reqwest::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Response too large: more than {0} bytes")]
    ResponseTooLarge(usize),

    #[error("Server returned a non-JSON response: {0}")]
    BadResponse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InvokeError>;
