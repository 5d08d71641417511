//! The `run` command: identify and anonymize every log under a path.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use log_anonymizer_core::{ConfigStore, RunReport, Scheduler, SchedulerOptions, WILDCARD_KIND};

pub async fn run_anonymize(
    store: Arc<ConfigStore>,
    options: SchedulerOptions,
    path: &Path,
    kind: &str,
) -> Result<RunReport> {
    if kind != WILDCARD_KIND && store.log_kind(kind).is_none() {
        warn!(
            "Kind '{}' is not declared in version '{}'; every file will be skipped.",
            kind,
            store.version()
        );
    }

    info!(
        "Anonymizing {} as [{}] with {} worker(s).",
        path.display(),
        kind,
        options.worker_count
    );
    let scheduler = Scheduler::new(store, options);
    let report = scheduler
        .run(path, kind)
        .await
        .with_context(|| format!("Failed to process {}", path.display()))?;

    info!(
        "Done: {} file(s) anonymized, {} failed.",
        report.outputs.len(),
        report.failed
    );
    Ok(report)
}
