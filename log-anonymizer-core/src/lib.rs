// log-anonymizer-core/src/lib.rs
//! # log-anonymizer core library
//!
//! `log-anonymizer-core` holds everything the `log-anonymizer` CLI does that is
//! not about the command line: the versioned rule catalogue, identification of
//! log files by name, capture-group redaction of lines, discovery of inputs
//! and outputs on disk, and the worker pool that ties them together.
//!
//! ## Modules
//!
//! * `config`: The YAML document model and the activated, read-only [`ConfigStore`].
//! * `patterns`: Eager compilation of naming and redaction patterns.
//! * `identifier`: Maps a file path to a log kind through its basename.
//! * `redactor`: Replaces capturing groups of matches with the obfuscation token.
//! * `redaction_match`: PII-safe debug logging of rewritten matches.
//! * `discovery`: Recursive walks for inputs and for previously produced outputs.
//! * `scheduler`: Bounded queue, fixed worker pool, output naming and cleanup.
//! * `errors`: The [`AnonymizerError`] enum.
//!
//! ## Usage Example
//!
//! ```rust
//! use log_anonymizer_core::{AnonymizerConfiguration, ConfigStore, Redactor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let yaml = r#"
//! anonymizer:
//!   - axcVersion: default
//!     logs:
//!       - kind: engine
//!         namingPatterns: ['^engine-\d+\.log$']
//!         regexPatterns: ['user=(\w+)']
//! "#;
//! let document: AnonymizerConfiguration = serde_yml::from_str(yaml)?;
//! let store = ConfigStore::activate(document.select("default")?.clone())?;
//!
//! let redactor = Redactor::new("X");
//! let patterns = store.redaction_patterns("engine")?;
//! let line = redactor.redact(b"ts=1 user=alice action=login", patterns.iter().copied());
//! assert_eq!(line, b"ts=1 user=X action=login");
//! # Ok(())
//! # }
//! ```
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod discovery;
pub mod errors;
pub mod identifier;
pub mod patterns;
pub mod redaction_match;
pub mod redactor;
pub mod scheduler;

/// Configuration document and the activated store.
pub use config::{
    AnonymizerConfiguration,
    ConfigStore,
    LogKind,
    VersionedConfig,
    WILDCARD_KIND,
};

pub use errors::AnonymizerError;

pub use patterns::compiler::{compile_pattern, CompiledPattern};

pub use identifier::identify;

pub use redactor::{Redactor, DEFAULT_OBFUSCATION};

pub use discovery::{discover, discover_anonymized, is_anonymized, LogFile, ANONYMIZED_MARKER};

pub use scheduler::{
    output_path_for,
    CleanupReport,
    RunReport,
    Scheduler,
    SchedulerOptions,
    DEFAULT_WORKER_COUNT,
    MAX_LINE_LENGTH,
};
