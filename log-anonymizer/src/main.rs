// log-anonymizer/src/main.rs
//! log-anonymizer entry point.
//!
//! Parses the command line, installs the logger and runs the selected
//! subcommand. Any error reaching this level is fatal: it is reported on
//! stderr and the process exits with status 1.

use clap::Parser;
use log::LevelFilter;

use log_anonymizer::cli::Cli;
use log_anonymizer::ui::output_format::error_msg;
use log_anonymizer::{dispatch, logger};

#[tokio::main]
async fn main() {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(cli.debug.then_some(LevelFilter::Debug));
    log::debug!("log-anonymizer started. Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = dispatch(cli).await {
        error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}
