// Classify module - maps a RawResult to exactly one Outcome
#![allow(dead_code)]

pub mod outcome;

pub use outcome::{ExitInfo, Outcome, TRUNCATION_NOTICE, UNAUTHORIZED_HINT, timeout_notice};

use crate::invoke::{RawResult, RawStatus, RunResponse};
use tracing::debug;

/// The literal error string the playground uses for a bad or missing key
pub const UNAUTHORIZED_ERROR: &str = "Unauthorized";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Classify a raw result. Total and deterministic.
pub fn classify(raw: RawResult) -> Outcome {
    let outcome = classify_inner(raw);
    debug!(outcome = outcome.label(), "classified result");
    outcome
}

fn classify_inner(raw: RawResult) -> Outcome {
    if let Some(error) = raw.transport_error {
        let mut detail = combine(raw.stdout, &raw.stderr);
        push_line(&mut detail, &error);
        return Outcome::TransportFailure { detail };
    }

    match raw.status {
        None => Outcome::TransportFailure {
            detail: "Executor returned no status".to_string(),
        },
        Some(RawStatus::Unresolved { detail }) => Outcome::ToolNotFound { detail },
        Some(RawStatus::Http(status)) => classify_remote(status, raw.payload),
        Some(status) => classify_local(status, raw.stdout, &raw.stderr, raw.truncated),
    }
}

fn classify_remote(status: u16, payload: Option<RunResponse>) -> Outcome {
    let Some(payload) = payload else {
        return Outcome::TransportFailure {
            detail: format!("HTTP {} without a response body", status),
        };
    };

    if status == 401 || payload.error.as_deref() == Some(UNAUTHORIZED_ERROR) {
        return Outcome::Unauthorized {
            hint: UNAUTHORIZED_HINT.to_string(),
        };
    }

    if (200..300).contains(&status) && payload.success {
        return Outcome::Success {
            output: payload.output.unwrap_or_default(),
        };
    }

    let output = payload
        .output
        .filter(|s| !s.is_empty())
        .or(payload.error.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    Outcome::ToolFailure {
        output,
        exit_info: ExitInfo::Remote { status },
    }
}

fn classify_local(status: RawStatus, stdout: String, stderr: &str, truncated: bool) -> Outcome {
    let mut output = combine(stdout, stderr);

    if truncated {
        push_line(&mut output, TRUNCATION_NOTICE);
    }

    let exit_info = match status {
        RawStatus::Exit(0) if !truncated => return Outcome::Success { output },
        RawStatus::TimedOut { after } => {
            push_line(&mut output, &timeout_notice(after));
            ExitInfo::TimedOut { after }
        }
        _ if truncated => ExitInfo::OutputLimit,
        RawStatus::Exit(code) => ExitInfo::Code(code),
        _ => ExitInfo::Terminated,
    };

    Outcome::ToolFailure { output, exit_info }
}

/// stdout then stderr, in that order
fn combine(mut stdout: String, stderr: &str) -> String {
    stdout.push_str(stderr);
    stdout
}

fn push_line(output: &mut String, line: &str) {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(line);
}
