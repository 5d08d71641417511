//! The `cleanUp` command: delete every anonymized output under a path.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use log_anonymizer_core::{CleanupReport, Scheduler};

pub async fn run_cleanup(path: &Path) -> Result<CleanupReport> {
    let report = Scheduler::cleanup(path)
        .await
        .with_context(|| format!("Failed to clean up {}", path.display()))?;
    info!("{} anonymized file(s) removed from {}.", report.removed.len(), path.display());
    Ok(report)
}
