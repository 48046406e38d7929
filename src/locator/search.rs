// Executor resolution - ordered candidate search

use super::config::{LocalSettings, RemoteSettings};
use super::error::LocateError;
use super::types::{ENTRY_POINT, ExecutorTarget, RUN_PATH, SCRIPT_SUFFIX, SourceFile};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where a candidate tool path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// The explicit tool path setting
    Configured,
    /// cli.py next to the file being acted upon
    FileAdjacent,
    /// cli.py at the root of a workspace folder
    WorkspaceRoot,
}

/// Search order; the first existing candidate wins
pub const SEARCH_ORDER: [CandidateOrigin; 3] = [
    CandidateOrigin::Configured,
    CandidateOrigin::FileAdjacent,
    CandidateOrigin::WorkspaceRoot,
];

/// A tool path to probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub origin: CandidateOrigin,
    pub path: PathBuf,
}

/// Interpret the tool path setting.
///
/// A value ending in `.py` (any case) is a direct script reference and is
/// used unchanged; anything else names a folder that holds `cli.py`.
pub fn configured_candidate(tool_path: &str) -> Option<PathBuf> {
    let trimmed = tool_path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.to_lowercase().ends_with(SCRIPT_SUFFIX) {
        Some(PathBuf::from(trimmed))
    } else {
        Some(Path::new(trimmed).join(ENTRY_POINT))
    }
}

/// Candidates in `SEARCH_ORDER`. Nothing touches the filesystem here.
pub fn candidates<'a>(
    settings: &'a LocalSettings,
    file: &'a SourceFile,
) -> impl Iterator<Item = Candidate> + 'a {
    SEARCH_ORDER.into_iter().flat_map(move |origin| {
        let paths: Vec<PathBuf> = match origin {
            CandidateOrigin::Configured => {
                configured_candidate(&settings.tool_path).into_iter().collect()
            }
            CandidateOrigin::FileAdjacent => vec![file.dir().join(ENTRY_POINT)],
            CandidateOrigin::WorkspaceRoot => settings
                .workspace_folders
                .iter()
                .map(|folder| folder.join(ENTRY_POINT))
                .collect(),
        };
        paths.into_iter().map(move |path| Candidate { origin, path })
    })
}

fn is_existing_file(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "candidate not readable, skipping");
            false
        }
    }
}

/// Resolve the local tool for `file`; stops at the first existing candidate
pub fn resolve_local(
    settings: &LocalSettings,
    file: &SourceFile,
) -> Result<ExecutorTarget, LocateError> {
    let found = candidates(settings, file).find(|candidate| {
        let exists = is_existing_file(&candidate.path);
        debug!(
            origin = ?candidate.origin,
            path = %candidate.path.display(),
            exists = exists,
            "probing tool candidate"
        );
        exists
    });

    match found {
        Some(candidate) => {
            info!(
                origin = ?candidate.origin,
                tool_path = %candidate.path.display(),
                interpreter = %settings.interpreter(),
                "resolved local executor"
            );
            Ok(ExecutorTarget::Local {
                interpreter_path: settings.interpreter().to_string(),
                tool_path: candidate.path,
            })
        }
        None => {
            warn!(file = %file.path().display(), "no cli.py candidate found");
            Err(LocateError::not_found())
        }
    }
}

/// Remote resolution cannot fail; only the call itself can
pub fn resolve_remote(settings: &RemoteSettings) -> ExecutorTarget {
    let endpoint_url = format!("{}{}", settings.endpoint.trim_end_matches('/'), RUN_PATH);
    debug!(endpoint_url = %endpoint_url, "resolved remote executor");
    ExecutorTarget::Remote { endpoint_url }
}
