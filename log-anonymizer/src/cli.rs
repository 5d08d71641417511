//! This file defines the command-line interface (CLI) for log-anonymizer,
//! including the global options shared by every subcommand.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use log_anonymizer_core::{DEFAULT_OBFUSCATION, DEFAULT_WORKER_COUNT, WILDCARD_KIND};

pub const DEFAULT_CONFIG: &str = "config.yaml";
pub const DEFAULT_AXC_VERSION: &str = "default";

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "log-anonymizer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log Anonymizer",
    long_about = "Walks a file or directory, identifies log files by their name and writes an anonymized copy next to each of them. Sensitive values are located with the regular expressions of the selected configuration version and only their capturing groups are replaced.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Anonymizer configuration file path.
    #[arg(
        long = "config",
        short = 'c',
        value_name = "FILE",
        default_value = DEFAULT_CONFIG,
        env = "LOG_ANONYMIZER_CONFIG",
        global = true,
        help = "Anonymizer configuration file path."
    )]
    pub config: PathBuf,

    /// Configuration version to activate.
    #[arg(
        long = "axcVersion",
        short = 'x',
        value_name = "VERSION",
        default_value = DEFAULT_AXC_VERSION,
        env = "LOG_ANONYMIZER_VERSION",
        global = true,
        help = "Configuration version to activate."
    )]
    pub axc_version: String,

    /// Kind of log files to process, `*` for automatic detection.
    #[arg(
        long = "kind",
        short = 'k',
        value_name = "KIND",
        default_value = WILDCARD_KIND,
        global = true,
        help = "Type of log files, e.g. engine. '*' detects the type from the file name."
    )]
    pub kind: String,

    /// Replacement text for sensitive values.
    #[arg(
        long = "obfuscation",
        short = 's',
        value_name = "TEXT",
        default_value = DEFAULT_OBFUSCATION,
        global = true,
        help = "Text substituted for every sensitive value."
    )]
    pub obfuscation: String,

    /// Number of files processed in parallel.
    #[arg(
        long = "workerCount",
        short = 't',
        value_name = "N",
        default_value_t = DEFAULT_WORKER_COUNT,
        value_parser = parse_worker_count,
        global = true,
        help = "Number of files processed in parallel."
    )]
    pub worker_count: usize,

    /// Enable debug logging.
    #[arg(long = "debug", short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `log-anonymizer` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identifies and anonymizes every log under a path.
    #[command(name = "run", about = "Anonymize the log files found under a file or folder.")]
    Run(PathArgs),

    /// Deletes previously produced anonymized files.
    #[command(
        name = "cleanUp",
        visible_alias = "cu",
        about = "Delete the anonymized files found under a file or folder."
    )]
    CleanUp(PathArgs),

    /// Lists the naming patterns of the active version.
    #[command(
        name = "listNamingPatterns",
        visible_alias = "ln",
        about = "List the naming patterns used to detect log types."
    )]
    ListNamingPatterns,

    /// Lists the redaction patterns of the active version.
    #[command(
        name = "listRegexPatterns",
        visible_alias = "lr",
        about = "List the regex patterns used to find sensitive values."
    )]
    ListRegexPatterns,

    /// Lists the kinds of the active version.
    #[command(name = "listKinds", visible_alias = "lk", about = "List the known log types.")]
    ListKinds,
}

/// Arguments of the commands that walk the filesystem.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// File or folder to be processed.
    #[arg(long = "path", value_name = "PATH", help = "File or folder to be processed.")]
    pub path: PathBuf,
}

fn parse_worker_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("worker count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid worker count '{}': {}", s, e)),
    }
}
