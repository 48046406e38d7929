// Outcome types - the only result shape the presentation layer branches on

use std::fmt;
use std::time::Duration;

/// Fixed remediation text for authorization failures
pub const UNAUTHORIZED_HINT: &str = "Unauthorized. Set an API key for the playground, then try again.";

/// Appended when a local run hits the wall-clock limit
pub fn timeout_notice(after: Duration) -> String {
    format!("\u{23f1}\u{fe0f} Timed out after {}s", after.as_secs_f64())
}

/// Appended when the capture ceiling cut the output
pub const TRUNCATION_NOTICE: &str = "\u{2026}(output truncated)";

/// How a failed tool run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitInfo {
    /// Nonzero exit code
    Code(i32),
    /// Killed by a signal
    Terminated,
    /// Killed after the wall-clock limit
    TimedOut { after: Duration },
    /// Killed after exceeding the capture ceiling
    OutputLimit,
    /// The playground reported failure
    Remote { status: u16 },
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitInfo::Code(code) => write!(f, "exit code: {}", code),
            ExitInfo::Terminated => write!(f, "terminated by signal"),
            ExitInfo::TimedOut { after } => write!(f, "timed out after {}s", after.as_secs_f64()),
            ExitInfo::OutputLimit => write!(f, "output limit exceeded"),
            ExitInfo::Remote { status } => write!(f, "HTTP {}", status),
        }
    }
}

/// Classified result of one execution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { output: String },
    ToolFailure { output: String, exit_info: ExitInfo },
    Unauthorized { hint: String },
    TransportFailure { detail: String },
    ToolNotFound { detail: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::ToolFailure { .. } => "tool_failure",
            Outcome::Unauthorized { .. } => "unauthorized",
            Outcome::TransportFailure { .. } => "transport_failure",
            Outcome::ToolNotFound { .. } => "tool_not_found",
        }
    }
}
