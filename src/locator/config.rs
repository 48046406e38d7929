// Locator configuration

use std::path::PathBuf;

/// Interpreter used when nothing else is configured
pub const DEFAULT_INTERPRETER: &str = "python";

/// Playground server address used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Settings for the local command-line executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    /// Path to the language runtime (default: python)
    pub interpreter_path: String,
    /// Path to cli.py, or to the folder that contains it (default: empty)
    pub tool_path: String,
    /// Open workspace folders, searched in declaration order
    pub workspace_folders: Vec<PathBuf>,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            interpreter_path: DEFAULT_INTERPRETER.to_string(),
            tool_path: String::new(),
            workspace_folders: Vec::new(),
        }
    }
}

impl LocalSettings {
    /// Interpreter to spawn; a blank setting falls back to the default
    pub fn interpreter(&self) -> &str {
        let trimmed = self.interpreter_path.trim();
        if trimmed.is_empty() {
            DEFAULT_INTERPRETER
        } else {
            trimmed
        }
    }
}

/// Settings for the remote playground executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Base URL of the playground server
    pub endpoint: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}
