// Data types for Invoke module

use crate::locator::SourceFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Operation requested from the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Run,
    Build,
    Format,
}

impl Operation {
    /// Argument passed to cli.py
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Run => "run",
            Operation::Build => "build",
            Operation::Format => "format",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the code comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Code typed into the playground
    Inline(String),
    /// A `.jatti` file on disk
    File(SourceFile),
}

/// One user action; built fresh and dropped once the call completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub source: Source,
    pub operation: Operation,
    pub credential: Option<String>,
}

impl ExecutionRequest {
    /// Playground run of inline code
    pub fn inline(code: impl Into<String>, credential: Option<String>) -> Self {
        Self {
            source: Source::Inline(code.into()),
            operation: Operation::Run,
            credential,
        }
    }

    /// Local operation on a file
    pub fn file(file: SourceFile, operation: Operation) -> Self {
        Self {
            source: Source::File(file),
            operation,
            credential: None,
        }
    }

    /// Credential to send, if any. Blank values are never sent.
    pub fn credential_header(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Body of `POST /api/run`
#[derive(Debug, Serialize)]
pub struct RunRequest<'a> {
    pub code: &'a str,
}

/// Body returned by `POST /api/run`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "timedOut")]
    pub timed_out: bool,
    #[serde(default)]
    pub truncated: bool,
}

/// How the call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    /// HTTP status of a playground response
    Http(u16),
    /// Process exit code
    Exit(i32),
    /// Process ended without an exit code (signal)
    Terminated,
    /// Process killed after the wall-clock limit
    TimedOut { after: Duration },
    /// No executor could serve the request; nothing was invoked
    Unresolved { detail: String },
}

/// Unclassified result of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResult {
    pub status: Option<RawStatus>,
    pub stdout: String,
    pub stderr: String,
    /// Parsed playground body
    pub payload: Option<RunResponse>,
    pub transport_error: Option<String>,
    /// Local capture hit the output ceiling
    pub truncated: bool,
}

impl RawResult {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            transport_error: Some(detail.into()),
            ..Default::default()
        }
    }

    pub fn unresolved(detail: impl Into<String>) -> Self {
        Self {
            status: Some(RawStatus::Unresolved {
                detail: detail.into(),
            }),
            ..Default::default()
        }
    }

    pub fn http(status: u16, payload: RunResponse) -> Self {
        Self {
            status: Some(RawStatus::Http(status)),
            payload: Some(payload),
            ..Default::default()
        }
    }

    pub fn process(status: RawStatus, stdout: &[u8], stderr: &[u8], truncated: bool) -> Self {
        Self {
            status: Some(status),
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
            truncated,
            ..Default::default()
        }
    }
}
