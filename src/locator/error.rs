// Error types for Locator module

use std::path::PathBuf;
use thiserror::Error;

/// Shown when no cli.py candidate exists on disk
pub const NOT_FOUND_REMEDIATION: &str = "Could not find cli.py. Set the tool path (jatti.cliPath / JATTI_TOOL_PATH / --tool-path) to your Jatti install folder or cli.py file.";

/// Locator errors
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("{remediation}")]
    NotFound { remediation: String },

    #[error("This is not a Jatti file (.jatti): {}", .0.display())]
    NotSourceFile(PathBuf),
}

impl LocateError {
    pub fn not_found() -> Self {
        LocateError::NotFound {
            remediation: NOT_FOUND_REMEDIATION.to_string(),
        }
    }
}
