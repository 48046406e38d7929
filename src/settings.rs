// Settings - defaults, then jatti.toml, then environment
// CLI flags are applied on top by the binaries

use crate::invoke::InvokeConfig;
use crate::locator::{LocalSettings, RemoteSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "jatti.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    jatti: FileSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileSection {
    python_path: Option<String>,
    cli_path: Option<String>,
    workspace_folders: Option<Vec<PathBuf>>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    max_output_bytes: Option<usize>,
    request_timeout_secs: Option<u64>,
    max_response_bytes: Option<usize>,
}

/// Everything the bridge reads from its environment
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub local: LocalSettings,
    pub remote: RemoteSettings,
    pub invoke: InvokeConfig,
    /// Session credential from JATTI_API_KEY
    pub api_key: Option<String>,
}

/// Parse a variable, warning and keeping `current` if the value is invalid.
fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>, current: T) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %v, "Invalid env var value, using default");
                current
            }
        },
        None => current,
    }
}

impl Settings {
    /// Load from `path` (or `./jatti.toml` when present) and the environment.
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let mut settings = Settings::default();

        match path {
            Some(path) if !path.exists() => return Err(SettingsError::Missing(path.into())),
            Some(path) => settings.apply_file(path)?,
            None => {
                let default = Path::new(SETTINGS_FILE);
                if default.exists() {
                    settings.apply_file(default)?;
                } else {
                    debug!("jatti.toml not found, using defaults");
                }
            }
        }

        settings.apply_vars(|name| std::env::var(name).ok());
        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        let content = std::fs::read_to_string(path)?;
        self.apply_toml(&content)?;
        debug!(path = %path.display(), "loaded settings file");
        Ok(())
    }

    /// Apply the `[jatti]` table of a settings document
    pub fn apply_toml(&mut self, content: &str) -> Result<(), SettingsError> {
        let file: SettingsFile = toml::from_str(content)?;
        let section = file.jatti;

        if let Some(v) = section.python_path {
            self.local.interpreter_path = v;
        }
        if let Some(v) = section.cli_path {
            self.local.tool_path = v;
        }
        if let Some(v) = section.workspace_folders {
            self.local.workspace_folders = v;
        }
        if let Some(v) = section.endpoint {
            self.remote.endpoint = v;
        }
        if let Some(v) = section.timeout_secs {
            self.invoke.constraints.timeout_secs = v;
        }
        if let Some(v) = section.max_output_bytes {
            self.invoke.constraints.max_output_bytes = v;
        }
        if let Some(v) = section.request_timeout_secs {
            self.invoke.request_timeout_secs = v;
        }
        if let Some(v) = section.max_response_bytes {
            self.invoke.max_response_bytes = v;
        }
        Ok(())
    }

    /// Search `dir` for cli.py when no workspace folder was configured
    pub fn default_workspace(&mut self, dir: PathBuf) {
        if self.local.workspace_folders.is_empty() {
            debug!(dir = %dir.display(), "no workspace folders configured, using working directory");
            self.local.workspace_folders = vec![dir];
        }
    }

    /// Apply `JATTI_*` variables from `lookup`
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("JATTI_PYTHON_PATH") {
            self.local.interpreter_path = v;
        }
        if let Some(v) = lookup("JATTI_TOOL_PATH") {
            self.local.tool_path = v;
        }
        if let Some(v) = lookup("JATTI_WORKSPACE") {
            self.local.workspace_folders = std::env::split_paths(&v)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if let Some(v) = lookup("JATTI_ENDPOINT") {
            self.remote.endpoint = v;
        }

        let constraints = &mut self.invoke.constraints;
        constraints.timeout_secs = parse_var(
            "JATTI_TIMEOUT_SECS",
            lookup("JATTI_TIMEOUT_SECS"),
            constraints.timeout_secs,
        );
        constraints.max_output_bytes = parse_var(
            "JATTI_MAX_OUTPUT_BYTES",
            lookup("JATTI_MAX_OUTPUT_BYTES"),
            constraints.max_output_bytes,
        );
        self.invoke.request_timeout_secs = parse_var(
            "JATTI_REQUEST_TIMEOUT_SECS",
            lookup("JATTI_REQUEST_TIMEOUT_SECS"),
            self.invoke.request_timeout_secs,
        );
        self.invoke.max_response_bytes = parse_var(
            "JATTI_MAX_RESPONSE_BYTES",
            lookup("JATTI_MAX_RESPONSE_BYTES"),
            self.invoke.max_response_bytes,
        );

        if let Some(v) = lookup("JATTI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(v);
        }
    }
}
