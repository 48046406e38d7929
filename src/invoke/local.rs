// Local executor - spawns `<interpreter> <cli.py> <operation> <file>`

use crate::invoke::config::ExecutionConstraints;
use crate::invoke::error::{InvokeError, Result};
use crate::invoke::types::{ExecutionRequest, Operation, RawResult, RawStatus, Source};
use crate::invoke::Invoker;
use crate::locator::{ExecutorKind, LocalSettings, LocateError, SourceFile, resolve_local};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

const READ_CHUNK: usize = 8192;

/// Invoker for the local cli.py tool
pub struct LocalInvoker {
    settings: RwLock<LocalSettings>,
    constraints: ExecutionConstraints,
}

impl LocalInvoker {
    pub fn new(settings: LocalSettings, constraints: ExecutionConstraints) -> Self {
        debug!(
            interpreter = %settings.interpreter(),
            tool_path = %settings.tool_path,
            workspace_folders = settings.workspace_folders.len(),
            timeout_secs = constraints.timeout_secs,
            max_output_bytes = constraints.max_output_bytes,
            "initializing local invoker"
        );

        Self {
            settings: RwLock::new(settings),
            constraints,
        }
    }

    /// Replace the settings used by later requests
    pub fn update_settings(&self, settings: LocalSettings) {
        let mut guard = self.settings.write().unwrap_or_else(|e| e.into_inner());
        *guard = settings;
    }

    fn settings(&self) -> LocalSettings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Resolved on every call so setting changes apply to the next run
    fn resolve(&self, file: &SourceFile) -> std::result::Result<(String, PathBuf), LocateError> {
        resolve_local(&self.settings(), file)?
            .into_local()
            .ok_or_else(LocateError::not_found)
    }

    /// Quoted command line, as typed into a terminal
    pub fn command_line(&self, file: &SourceFile) -> Result<String> {
        let (interpreter, tool_path) = self.resolve(file)?;
        Ok(format!(
            "\"{}\" \"{}\" {} \"{}\"",
            interpreter,
            absolute(&tool_path).display(),
            Operation::Run,
            absolute(file.path()).display()
        ))
    }

    /// Run with inherited stdio and no capture or timeout; returns the exit code
    pub async fn run_in_terminal(&self, file: &SourceFile) -> Result<Option<i32>> {
        let (interpreter, tool_path) = self.resolve(file)?;
        let mut command = build_command(&interpreter, &tool_path, Operation::Run, file);
        command.kill_on_drop(true);

        info!(file = %file.path().display(), "running in terminal");
        let status = command
            .status()
            .await
            .map_err(|source| InvokeError::SpawnFailed {
                interpreter: interpreter.clone(),
                source,
            })?;

        Ok(status.code())
    }

    async fn spawn_and_capture(
        &self,
        interpreter: &str,
        tool_path: &Path,
        operation: Operation,
        file: &SourceFile,
    ) -> RawResult {
        let start = Instant::now();
        let limit = self.constraints.max_output_bytes;
        let timeout = Duration::from_secs(self.constraints.timeout_secs);

        let mut command = build_command(interpreter, tool_path, operation, file);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(interpreter = %interpreter, error = %e, "interpreter not found");
                return RawResult::unresolved(format!(
                    "Could not launch '{}': {}. Set the interpreter path (jatti.pythonPath / JATTI_PYTHON_PATH / --python).",
                    interpreter, e
                ));
            }
            Err(source) => {
                let error = InvokeError::SpawnFailed {
                    interpreter: interpreter.to_string(),
                    source,
                };
                warn!(error = %error, "spawn failed");
                return RawResult::transport(error.to_string());
            }
        };

        debug!(
            pid = child.id().unwrap_or(0),
            operation = %operation,
            file = %file.path().display(),
            "tool spawned"
        );

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        // Outside the timeout future so a timed-out run still reports it
        let mut overflow = false;

        let waited = tokio::time::timeout(timeout, async {
            let stdout_capture = capture(stdout_pipe, &mut stdout, limit);
            let stderr_capture = capture(stderr_pipe, &mut stderr, limit);
            tokio::pin!(stdout_capture, stderr_capture);

            let (mut stdout_done, mut stderr_done) = (false, false);
            while !(stdout_done && stderr_done) {
                let over = tokio::select! {
                    over = &mut stdout_capture, if !stdout_done => {
                        stdout_done = true;
                        over?
                    }
                    over = &mut stderr_capture, if !stderr_done => {
                        stderr_done = true;
                        over?
                    }
                };
                // Kill at the first overflow; the other stream may be held
                // open by grandchildren that outlive the tool
                if over {
                    overflow = true;
                    let _ = child.start_kill();
                    break;
                }
            }

            child.wait().await
        })
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        let (status, truncated) = match waited {
            Ok(Ok(exit)) => {
                let status = match exit.code() {
                    Some(code) => RawStatus::Exit(code),
                    None => RawStatus::Terminated,
                };
                (status, overflow)
            }
            Ok(Err(e)) => {
                let _ = child.kill().await;
                let error = InvokeError::WaitFailed(e);
                warn!(error = %error, duration_ms = duration_ms, "tool wait failed");
                let mut raw = RawResult::process(RawStatus::Terminated, &stdout, &stderr, overflow);
                raw.transport_error = Some(error.to_string());
                return raw;
            }
            Err(_) => {
                let _ = child.kill().await;
                warn!(
                    timeout_secs = self.constraints.timeout_secs,
                    operation = %operation,
                    "tool timed out and was killed"
                );
                (RawStatus::TimedOut { after: timeout }, overflow)
            }
        };

        if truncated {
            warn!(limit_bytes = limit, "tool output exceeded capture limit");
        }

        info!(
            operation = %operation,
            file = %file.display_name(),
            duration_ms = duration_ms,
            status = ?status,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "tool finished"
        );

        RawResult::process(status, &stdout, &stderr, truncated)
    }
}

#[async_trait]
impl Invoker for LocalInvoker {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Local
    }

    async fn invoke(&self, request: &ExecutionRequest) -> RawResult {
        let Source::File(file) = &request.source else {
            return RawResult::unresolved(
                "The local tool runs files on disk; save the code to a .jatti file first.",
            );
        };

        let (interpreter, tool_path) = match self.resolve(file) {
            Ok(parts) => parts,
            Err(e) => return RawResult::unresolved(e.to_string()),
        };

        self.spawn_and_capture(&interpreter, &tool_path, request.operation, file)
            .await
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// The working directory moves to the tool's folder, so both paths are made absolute first
fn build_command(
    interpreter: &str,
    tool_path: &Path,
    operation: Operation,
    file: &SourceFile,
) -> Command {
    let tool_path = absolute(tool_path);
    let mut command = Command::new(interpreter);
    command
        .arg(&tool_path)
        .arg(operation.as_str())
        .arg(absolute(file.path()));

    if let Some(dir) = tool_path.parent() {
        command.current_dir(dir);
    }
    command
}

/// Append at most `limit` bytes from `pipe` into `sink`; true when the limit was hit.
/// Bytes land in `sink` as they arrive, so a cancelled capture keeps its prefix.
/// On overflow the pipe is dropped here, which closes it on the tool's side.
async fn capture<R: AsyncRead + Unpin>(
    pipe: Option<R>,
    sink: &mut Vec<u8>,
    limit: usize,
) -> io::Result<bool> {
    let Some(mut pipe) = pipe else {
        return Ok(false);
    };

    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            return Ok(false);
        }

        let room = limit.saturating_sub(sink.len());
        if n > room {
            sink.extend_from_slice(&chunk[..room]);
            return Ok(true);
        }
        sink.extend_from_slice(&chunk[..n]);
    }
}
