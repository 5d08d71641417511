//! Filesystem discovery of input logs and of previously produced outputs.
//!
//! Both walks are recursive and follow walk order. A root that is a single
//! file is walked as itself. Errors reading the tree abort the walk; errors
//! about one file only skip that file.

use log::{debug, error};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ConfigStore;
use crate::errors::{AnonymizerError, Result};
use crate::identifier::identify;

/// Infix carried by every output file. It is the sole marker used both to
/// exclude outputs from discovery and to find them again for cleanup.
pub const ANONYMIZED_MARKER: &str = ".anonymized.";

/// A log scheduled for anonymization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub absolute_path: PathBuf,
    pub kind: String,
}

/// Returns true if `path` names an anonymized output.
pub fn is_anonymized(path: &Path) -> bool {
    path.to_string_lossy().contains(ANONYMIZED_MARKER)
}

/// Collects every identifiable, not yet anonymized log under `root`.
pub fn discover(store: &ConfigStore, root: &Path, kind_filter: &str) -> Result<Vec<LogFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        if is_anonymized(path) {
            debug!("Skipping anonymized output: {}", path.display());
            continue;
        }

        let kind = match identify(store, path, kind_filter) {
            Ok(kind) => kind,
            Err(e) => {
                error!("{}", e);
                continue;
            }
        };

        match std::path::absolute(path) {
            Ok(absolute_path) => files.push(LogFile { absolute_path, kind }),
            Err(e) => error!("{}", AnonymizerError::io("failed to resolve", path, e)),
        }
    }

    debug!("Discovered {} log file(s) under {}.", files.len(), root.display());
    Ok(files)
}

/// Collects the absolute path of every anonymized output under `root`.
pub fn discover_anonymized(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_anonymized(entry.path()) {
            continue;
        }
        match std::path::absolute(entry.path()) {
            Ok(p) => paths.push(p),
            Err(e) => error!("{}", AnonymizerError::io("failed to resolve", entry.path(), e)),
        }
    }

    Ok(paths)
}
