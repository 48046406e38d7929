// Terminal surfaces for the binaries

use super::controller::Surface;
use super::render::{Status, StatusKind};
use std::io::{self, Write};
use tracing::debug;

/// Layout of the terminal surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStyle {
    /// Output replaced per run, status shown as `(text)`
    Playground,
    /// Output appended like an output channel, status as a notification line
    Editor,
}

/// Prints tool output to stdout and status to stderr
pub struct ConsoleSurface {
    style: ConsoleStyle,
}

impl ConsoleSurface {
    pub fn new(style: ConsoleStyle) -> Self {
        Self { style }
    }

    fn write_out(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        if self.style == ConsoleStyle::Playground && !text.is_empty() && !text.ends_with('\n') {
            let _ = stdout.write_all(b"\n");
        }
        let _ = stdout.flush();
    }
}

impl Surface for ConsoleSurface {
    fn set_status(&mut self, status: &Status) {
        if status.is_empty() {
            return;
        }
        let tag = match status.kind {
            StatusKind::Info => "",
            StatusKind::Ok => "[ok] ",
            StatusKind::Error => "[error] ",
        };
        match self.style {
            ConsoleStyle::Playground => eprintln!("({})", status.text),
            ConsoleStyle::Editor => eprintln!("{}{}", tag, status.text),
        }
    }

    // A terminal cannot take text back; replacing means printing the new text
    fn set_output(&mut self, text: &str) {
        self.write_out(text);
    }

    fn append_output(&mut self, text: &str) {
        self.write_out(text);
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        debug!(enabled = enabled, "trigger state changed");
    }

    fn focus_credential(&mut self) {
        eprintln!("> :key <value>");
    }
}
