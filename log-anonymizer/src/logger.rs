//! Logger initialisation for the `log-anonymizer` binary.
//!
//! Warnings and errors are shown by default: files that could not be handled
//! and configuration problems such as patterns that failed to compile.
//! `RUST_LOG` refines this when `--debug` is not given.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global logger, writing to stderr.
///
/// `level_override` replaces the default level (and the global level of
/// `RUST_LOG`). Calling it twice is harmless; the second call is ignored.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr);
    let _ = builder.try_init();
}
