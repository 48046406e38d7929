// Rendering of outcomes for the two front-ends

use crate::classify::{ExitInfo, Outcome};
use crate::invoke::Operation;
use crate::locator::SourceFile;

/// Rule drawn around tool output in the editor view
pub const SEPARATOR_WIDTH: usize = 50;

/// Extra guidance shown under the unauthorized hint
pub const CREDENTIAL_REMEDIATION: &str =
    "Enter a key with `:key <value>`, pass --api-key, or set JATTI_API_KEY.";

/// Status indicator colour class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Ok,
    Error,
}

/// Status indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn none() -> Self {
        Self::info("")
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Ok,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// What the surface should show for one outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub status: Status,
    pub output: String,
    pub focus_credential: bool,
}

pub fn separator() -> String {
    "\u{2501}".repeat(SEPARATOR_WIDTH)
}

/// Playground view: output verbatim, failures as readable messages
pub fn playground(outcome: &Outcome) -> View {
    match outcome {
        Outcome::Success { output } => View {
            status: Status::ok("ok"),
            output: output.clone(),
            focus_credential: false,
        },
        Outcome::ToolFailure { output, .. } => View {
            status: Status::error("error"),
            output: output.clone(),
            focus_credential: false,
        },
        Outcome::Unauthorized { hint } => View {
            status: Status::error("error"),
            output: format!("{}\n{}", hint, CREDENTIAL_REMEDIATION),
            focus_credential: true,
        },
        Outcome::TransportFailure { detail } => View {
            status: Status::error("offline?"),
            output: detail.clone(),
            focus_credential: false,
        },
        Outcome::ToolNotFound { detail } => View {
            status: Status::error("not found"),
            output: detail.clone(),
            focus_credential: false,
        },
    }
}

/// Lines written before an editor command starts
pub fn editor_header(operation: Operation, file: &SourceFile) -> String {
    let mut header = match operation {
        Operation::Run => format!(
            "\u{23f3} Running: {}\n\u{1f4c1} Path: {}\n",
            file.display_name(),
            file.path().display()
        ),
        Operation::Build => format!("\u{1f528} Building: {}\n", file.display_name()),
        Operation::Format => format!("\u{1f4dd} Formatting: {}\n", file.display_name()),
    };
    header.push_str(&separator());
    header.push_str("\n\n");
    header
}

fn failure_noun(operation: Operation) -> &'static str {
    match operation {
        Operation::Run => "Execution",
        Operation::Build => "Build",
        Operation::Format => "Format",
    }
}

fn build_output_name(file: &SourceFile) -> String {
    file.build_output()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Editor view: captured text, a rule, then a completion line
pub fn editor(operation: Operation, file: &SourceFile, outcome: &Outcome) -> View {
    match outcome {
        Outcome::Success { output } => {
            let (line, status) = match operation {
                Operation::Run => (
                    "\u{2705} Execution completed successfully!".to_string(),
                    "\u{2705} Jatti file executed successfully!".to_string(),
                ),
                // The tool writes the sibling file; its presence is not checked
                Operation::Build => {
                    let built = build_output_name(file);
                    (
                        format!("\u{2705} Build completed! Created: {}", built),
                        format!("\u{2705} Built to {}", built),
                    )
                }
                Operation::Format => (
                    "\u{2705} Format completed!".to_string(),
                    "\u{2705} File formatted!".to_string(),
                ),
            };
            View {
                status: Status::ok(status),
                output: format!("{}\n{}\n{}\n", output, separator(), line),
                focus_credential: false,
            }
        }
        Outcome::ToolFailure { output, exit_info } => {
            let noun = failure_noun(operation);
            let line = match exit_info {
                ExitInfo::Code(code) => format!("\u{274c} {} failed with code {}", noun, code),
                other => format!("\u{274c} {} failed ({})", noun, other),
            };
            View {
                status: Status::error(format!("\u{274c} {} failed ({})", noun, exit_info)),
                output: format!("{}\n{}\n{}\n", output, separator(), line),
                focus_credential: false,
            }
        }
        Outcome::Unauthorized { hint } => View {
            status: Status::error(hint.clone()),
            output: format!("\u{274c} {}\n", hint),
            focus_credential: false,
        },
        Outcome::TransportFailure { detail } | Outcome::ToolNotFound { detail } => View {
            status: Status::error(detail.clone()),
            output: format!("\u{274c} {}\n", detail),
            focus_credential: false,
        },
    }
}
