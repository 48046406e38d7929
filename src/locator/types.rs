// Data types for Locator module

use super::LocateError;
use std::path::{Path, PathBuf};

/// Well-known tool entry point
pub const ENTRY_POINT: &str = "cli.py";
/// Suffix marking a configured tool path as a direct script reference
pub const SCRIPT_SUFFIX: &str = ".py";
/// Suffix of files the local commands accept
pub const SOURCE_SUFFIX: &str = ".jatti";
/// Extension of the file `build` writes next to the source
pub const BUILD_EXTENSION: &str = "py";
/// Route served by the playground
pub const RUN_PATH: &str = "/api/run";

/// Executor kind, fixed per front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorKind {
    Remote,
    Local,
}

/// A resolved executor; produced per request and never cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorTarget {
    Remote {
        endpoint_url: String,
    },
    Local {
        interpreter_path: String,
        tool_path: PathBuf,
    },
}

impl ExecutorTarget {
    /// Interpreter and tool path of a local target
    pub fn into_local(self) -> Option<(String, PathBuf)> {
        match self {
            ExecutorTarget::Local {
                interpreter_path,
                tool_path,
            } => Some((interpreter_path, tool_path)),
            ExecutorTarget::Remote { .. } => None,
        }
    }
}

/// A file that passed the `.jatti` gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile(PathBuf);

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, LocateError> {
        let path = path.into();
        let accepted = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SOURCE_SUFFIX));

        if accepted {
            Ok(Self(path))
        } else {
            Err(LocateError::NotSourceFile(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory holding the file
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name for display
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Sibling file the tool writes on `build`. Existence is never checked.
    pub fn build_output(&self) -> PathBuf {
        self.0.with_extension(BUILD_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_gate() {
        assert!(SourceFile::new("examples/hello.jatti").is_ok());
        assert!(SourceFile::new("hello.py").is_err());
        assert!(SourceFile::new("hello.jatti.bak").is_err());
        assert!(SourceFile::new("hello").is_err());
    }

    #[test]
    fn test_build_output_is_sibling() {
        let file = SourceFile::new("/work/demo/hello.jatti").unwrap();
        assert_eq!(file.build_output(), PathBuf::from("/work/demo/hello.py"));
        assert_eq!(file.dir(), Path::new("/work/demo"));
        assert_eq!(file.display_name(), "hello.jatti");
    }

    #[test]
    fn test_bare_file_name_has_empty_dir() {
        let file = SourceFile::new("hello.jatti").unwrap();
        assert_eq!(file.dir(), Path::new(""));
    }
}
