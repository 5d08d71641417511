//! Subcommand handlers.
//!
//! Every command starts by activating the requested configuration version;
//! the resulting store is passed down explicitly.

pub mod cleanup;
pub mod list;
pub mod run;

use anyhow::{Context, Result};
use log::debug;
use std::io;
use std::path::Path;
use std::sync::Arc;

use log_anonymizer_core::{AnonymizerConfiguration, ConfigStore, SchedulerOptions};

use crate::cli::{Cli, Commands};

/// Loads the configuration document and activates `version`.
pub fn load_store(config_path: &Path, version: &str) -> Result<ConfigStore> {
    debug!("axcVersion: {}", version);
    let document = AnonymizerConfiguration::load(config_path)?;
    let versioned = document.select(version)?.clone();
    debug!("active configuration: {:?}", versioned);
    let store = ConfigStore::activate(versioned)
        .with_context(|| format!("Failed to activate version '{}'", version))?;
    Ok(store)
}

/// Runs the subcommand selected on the command line.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let store = Arc::new(load_store(&cli.config, &cli.axc_version)?);

    match &cli.command {
        Commands::Run(args) => {
            let options = SchedulerOptions {
                worker_count: cli.worker_count,
                obfuscation: cli.obfuscation.clone(),
            };
            run::run_anonymize(store, options, &args.path, &cli.kind).await?;
        }
        Commands::CleanUp(args) => {
            cleanup::run_cleanup(&args.path).await?;
        }
        Commands::ListNamingPatterns => {
            list::list_naming_patterns(&store, &cli.kind, &mut io::stdout().lock())?;
        }
        Commands::ListRegexPatterns => {
            list::list_regex_patterns(&store, &cli.kind, &mut io::stdout().lock())?;
        }
        Commands::ListKinds => {
            list::list_kinds(&store, &mut io::stdout().lock())?;
        }
    }
    Ok(())
}
