// log-anonymizer/src/lib.rs
//! # log-anonymizer CLI
//!
//! The command-line front end of `log-anonymizer-core`: argument parsing,
//! logger setup, subcommand handlers and terminal output.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::dispatch;
