//! errors.rs - Error types for the log-anonymizer-core library.
//!
//! Each variant maps to one failure mode of the pipeline. Callers decide the
//! policy: configuration errors are fatal at startup, per-file errors are
//! logged and the file is skipped.
//!
//! License: MIT OR Apache-2.0

use std::path::PathBuf;
use thiserror::Error;

/// All error types raised by `log-anonymizer-core`.
///
/// `#[non_exhaustive]` keeps room for new failure modes without breaking
/// downstream `match` statements.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnonymizerError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("no config found for version {0}")]
    VersionNotFound(String),

    #[error("Invalid configuration for version {version}:\n{details}")]
    InvalidConfig { version: String, details: String },

    #[error("no {what} found for kind '{kind}' under version {version}")]
    NoPatternsFound {
        what: &'static str,
        kind: String,
        version: String,
    },

    #[error("Failed to compile pattern '{pattern}' of kind '{kind}': {source}")]
    PatternCompile {
        kind: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("not able to detect log type: {0}")]
    Unidentified(String),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} of {} exceeds the maximum length of {max} bytes", path.display())]
    LineTooLong { path: PathBuf, line: usize, max: usize },

    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("A worker task failed: {0}")]
    Worker(String),
}

impl AnonymizerError {
    /// Wraps an I/O error with the action that failed and the affected path.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = AnonymizerError> = std::result::Result<T, E>;
