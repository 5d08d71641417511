//! Parallel anonymization of discovered logs, and cleanup of outputs.
//!
//! A bounded queue of capacity `worker_count` feeds exactly `worker_count`
//! long-lived workers. The producer blocks while every worker is busy, so
//! memory stays proportional to the worker count whatever the size of the
//! tree. Each file is handled start to finish by one worker:
//!
//! `pending -> opened -> streaming -> closed`, or `pending -> aborted`.
//!
//! A failing file is logged and skipped; it never stops the run. Partial
//! outputs of aborted files are left on disk and, carrying the anonymized
//! marker, are ignored by later runs.

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::config::ConfigStore;
use crate::discovery::{discover, discover_anonymized, LogFile, ANONYMIZED_MARKER};
use crate::errors::{AnonymizerError, Result};
use crate::patterns::compiler::CompiledPattern;
use crate::redactor::{Redactor, DEFAULT_OBFUSCATION};

pub const DEFAULT_WORKER_COUNT: usize = 2;

/// Longest accepted line, terminator excluded. Longer lines abort the file.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Local-time suffix of output files, e.g. `20240131-235959`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// How many counter suffixes are tried when an output name is taken.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Construction-time settings of a [`Scheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Number of concurrent workers; values below 1 are raised to 1.
    pub worker_count: usize,
    /// Token substituted for every captured group.
    pub obfuscation: String,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            obfuscation: DEFAULT_OBFUSCATION.to_string(),
        }
    }
}

/// Outcome of a processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Output files that were written completely.
    pub outputs: Vec<PathBuf>,
    /// Files that were skipped or aborted.
    pub failed: usize,
}

impl RunReport {
    fn merge(&mut self, other: RunReport) {
        self.outputs.extend(other.outputs);
        self.failed += other.failed;
    }
}

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: usize,
}

/// Drives discovery and the worker pool for one activated configuration.
#[derive(Debug)]
pub struct Scheduler {
    store: Arc<ConfigStore>,
    redactor: Arc<Redactor>,
    worker_count: usize,
}

impl Scheduler {
    pub fn new(store: Arc<ConfigStore>, options: SchedulerOptions) -> Self {
        if options.worker_count == 0 {
            warn!("Worker count 0 is not usable, running with 1 worker.");
        }
        Self {
            store,
            redactor: Arc::new(Redactor::new(options.obfuscation)),
            worker_count: options.worker_count.max(1),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Discovers the logs under `root` and anonymizes them.
    ///
    /// Fails only when the directory walk itself fails.
    pub async fn run(&self, root: &Path, kind_filter: &str) -> Result<RunReport> {
        let store = Arc::clone(&self.store);
        let root = root.to_path_buf();
        let kind_filter = kind_filter.to_string();

        let files = tokio::task::spawn_blocking(move || discover(&store, &root, &kind_filter))
            .await
            .map_err(|e| AnonymizerError::Worker(e.to_string()))??;

        Ok(self.process(files).await)
    }

    /// Anonymizes every file with the worker pool and waits for completion.
    pub async fn process(&self, files: Vec<LogFile>) -> RunReport {
        let (tx, rx) = mpsc::channel::<LogFile>(self.worker_count);
        let rx = Arc::new(Mutex::new(rx));
        let mut workers = JoinSet::new();

        for worker_id in 0..self.worker_count {
            let rx = Arc::clone(&rx);
            let store = Arc::clone(&self.store);
            let redactor = Arc::clone(&self.redactor);

            workers.spawn(async move {
                let mut report = RunReport::default();
                loop {
                    let next = rx.lock().await.recv().await;
                    let Some(file) = next else { break };

                    match anonymize_file(&store, &redactor, &file).await {
                        Ok(output) => report.outputs.push(output),
                        Err(e) => {
                            error!("{}", e);
                            report.failed += 1;
                        }
                    }
                }
                debug!("worker {} drained the queue", worker_id);
                report
            });
        }

        for file in files {
            if tx.send(file).await.is_err() {
                error!("All workers stopped before the queue was drained.");
                break;
            }
        }
        drop(tx);

        let mut report = RunReport::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(worker_report) => report.merge(worker_report),
                Err(e) => error!("{}", AnonymizerError::Worker(e.to_string())),
            }
        }

        info!(
            "Anonymized {} file(s), {} failed.",
            report.outputs.len(),
            report.failed
        );
        report
    }

    /// Deletes every anonymized output under `root`.
    ///
    /// Deletion failures are logged and counted; only a failing walk is an error.
    pub async fn cleanup(root: &Path) -> Result<CleanupReport> {
        let walk_root = root.to_path_buf();
        let paths = tokio::task::spawn_blocking(move || discover_anonymized(&walk_root))
            .await
            .map_err(|e| AnonymizerError::Worker(e.to_string()))??;

        let mut report = CleanupReport::default();
        if paths.is_empty() {
            info!("No anonymized logs found");
            return Ok(report);
        }

        for path in paths {
            debug!("{}", path.display());
            match tokio::fs::remove_file(&path).await {
                Ok(()) => report.removed.push(path),
                Err(e) => {
                    error!("{}", AnonymizerError::io("failed to delete", path, e));
                    report.failed += 1;
                }
            }
        }

        info!(
            "Removed {} anonymized file(s), {} could not be deleted.",
            report.removed.len(),
            report.failed
        );
        Ok(report)
    }
}

/// `<input>.anonymized.<YYYYMMDD-HHMMSS>` for the given local time.
pub fn output_path_for(input: &Path, now: DateTime<Local>) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_os_string();
    name.push(ANONYMIZED_MARKER);
    name.push(now.format(TIMESTAMP_FORMAT).to_string());
    PathBuf::from(name)
}

fn with_counter(base: &Path, counter: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}", counter));
    PathBuf::from(name)
}

/// Creates the output next to `input`, never overwriting an existing file.
async fn create_output(input: &Path, now: DateTime<Local>) -> Result<(PathBuf, File)> {
    let base = output_path_for(input, now);
    let mut candidate = base.clone();

    for counter in 1..=MAX_NAME_ATTEMPTS {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                candidate = with_counter(&base, counter);
            }
            Err(e) => return Err(AnonymizerError::io("failed to create", candidate, e)),
        }
    }

    Err(AnonymizerError::io(
        "failed to create",
        base,
        std::io::Error::new(ErrorKind::AlreadyExists, "every candidate output name is taken"),
    ))
}

/// Processes one file. Both handles are owned here and dropped on every path.
async fn anonymize_file(store: &ConfigStore, redactor: &Redactor, file: &LogFile) -> Result<PathBuf> {
    let path = &file.absolute_path;
    debug!("processing [{}] log file: {}", file.kind, path.display());

    let patterns = store.redaction_patterns(&file.kind)?;

    let input = File::open(path)
        .await
        .map_err(|e| AnonymizerError::io("failed to open", path, e))?;
    let (output_path, output) = create_output(path, Local::now()).await?;

    stream_lines(path, input, &output_path, output, redactor, &patterns).await?;

    debug!("finished processing [{}] log file: {}", file.kind, path.display());
    Ok(output_path)
}

async fn stream_lines(
    source: &Path,
    input: File,
    destination: &Path,
    output: File,
    redactor: &Redactor,
    patterns: &[&CompiledPattern],
) -> Result<()> {
    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let mut buf: Vec<u8> = Vec::new();
    let mut line_number = 0usize;
    // Room for the longest line plus "\r\n".
    let read_limit = (MAX_LINE_LENGTH + 2) as u64;

    loop {
        buf.clear();
        let read = (&mut reader)
            .take(read_limit)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| AnonymizerError::io("failed to read", source, e))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        if buf.len() > MAX_LINE_LENGTH {
            return Err(AnonymizerError::LineTooLong {
                path: source.to_path_buf(),
                line: line_number,
                max: MAX_LINE_LENGTH,
            });
        }

        let redacted = redactor.redact(&buf, patterns.iter().copied());
        writer
            .write_all(&redacted)
            .await
            .map_err(|e| AnonymizerError::io("failed to write", destination, e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| AnonymizerError::io("failed to write", destination, e))?;
    }

    writer
        .flush()
        .await
        .map_err(|e| AnonymizerError::io("failed to write", destination, e))?;
    Ok(())
}
