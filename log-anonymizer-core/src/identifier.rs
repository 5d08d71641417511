//! Maps a file path to the kind of log it holds.

use log::debug;
use std::path::Path;

use crate::config::{ConfigStore, WILDCARD_KIND};
use crate::errors::{AnonymizerError, Result};

/// Returns the kind of the log at `path`.
///
/// A concrete `kind_filter` is returned as is, without looking at the file.
/// With the wildcard, the basename is tested against every naming pattern in
/// declaration order and the first matching pattern's kind wins.
pub fn identify(store: &ConfigStore, path: &Path, kind_filter: &str) -> Result<String> {
    if kind_filter != WILDCARD_KIND {
        return Ok(kind_filter.to_string());
    }

    let basename = basename(path);
    let naming_patterns = store.naming_patterns(WILDCARD_KIND)?;

    naming_patterns
        .iter()
        .find(|p| p.is_match(&basename))
        .map(|p| {
            debug!("'{}' identified as [{}] by pattern '{}'", basename, p.kind, p.source);
            p.kind.clone()
        })
        .ok_or(AnonymizerError::Unidentified(basename))
}

/// Last path component, lossily converted; the whole path when there is none.
fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
