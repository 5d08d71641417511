//! Configuration management for `log-anonymizer-core`.
//!
//! The configuration document is a list of versioned catalogues. Exactly one
//! of them is activated at startup, which compiles all of its patterns into a
//! read-only [`ConfigStore`] that the rest of the pipeline queries by kind.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::{AnonymizerError, Result};
use crate::patterns::compiler::{compile_log_kinds, CompiledPattern};

/// Kind filter selecting every kind of the active version.
pub const WILDCARD_KIND: &str = "*";

/// One class of log files and the rules that apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogKind {
    /// Unique, non-empty name of the kind (e.g. "engine").
    pub kind: String,
    /// Regexes tested against a file's basename to assign it to this kind.
    #[serde(rename = "namingPatterns", default)]
    pub naming_patterns: Vec<String>,
    /// Regexes whose capturing groups delimit the text to obfuscate.
    #[serde(rename = "regexPatterns", default)]
    pub redaction_patterns: Vec<String>,
}

/// The catalogue of log kinds for one product version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionedConfig {
    #[serde(rename = "axcVersion")]
    pub version: String,
    #[serde(rename = "logs", default)]
    pub log_kinds: Vec<LogKind>,
}

/// The whole configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnonymizerConfiguration {
    #[serde(rename = "anonymizer", default)]
    pub versions: Vec<VersionedConfig>,
}

impl AnonymizerConfiguration {
    /// Reads and parses a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| AnonymizerError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AnonymizerConfiguration =
            serde_yml::from_str(&text).map_err(|e| AnonymizerError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!(
            "Loaded {} versioned configuration(s) from {}.",
            config.versions.len(),
            path.display()
        );
        Ok(config)
    }

    /// Returns the first entry whose version equals `version` exactly.
    pub fn select(&self, version: &str) -> Result<&VersionedConfig> {
        self.versions
            .iter()
            .find(|v| v.version == version)
            .ok_or_else(|| AnonymizerError::VersionNotFound(version.to_string()))
    }
}

/// The activated, immutable view over one [`VersionedConfig`].
///
/// Patterns are compiled once on activation. Queries return them in
/// declaration order, which matters for identification tie-breaks and for
/// the sequential application of redactions.
#[derive(Debug)]
pub struct ConfigStore {
    version: String,
    log_kinds: Vec<LogKind>,
    naming: Vec<CompiledPattern>,
    redaction: Vec<CompiledPattern>,
}

impl ConfigStore {
    /// Validates the kinds of `config` and compiles its patterns.
    ///
    /// Empty or duplicate kinds are fatal. Patterns that fail to compile are
    /// reported in a single warning and left out of the store.
    pub fn activate(config: VersionedConfig) -> Result<Self> {
        validate_log_kinds(&config)?;

        let catalogue = compile_log_kinds(&config.log_kinds);
        if !catalogue.failures.is_empty() {
            let listing = catalogue
                .failures
                .iter()
                .map(|e| format!("  - {}", e))
                .collect::<Vec<_>>()
                .join("\n");
            warn!(
                "Ignoring {} invalid pattern(s) in version '{}':\n{}",
                catalogue.failures.len(),
                config.version,
                listing
            );
        }

        info!(
            "Activated version '{}' with {} kind(s).",
            config.version,
            config.log_kinds.len()
        );

        Ok(Self {
            version: config.version,
            log_kinds: config.log_kinds,
            naming: catalogue.naming,
            redaction: catalogue.redaction,
        })
    }

    /// The version string this store was activated from.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The name of every kind, in declaration order.
    pub fn kinds(&self) -> Vec<&str> {
        self.log_kinds.iter().map(|k| k.kind.as_str()).collect()
    }

    /// Looks up one kind by name.
    pub fn log_kind(&self, kind: &str) -> Option<&LogKind> {
        self.log_kinds.iter().find(|k| k.kind == kind)
    }

    /// Naming patterns of `kind_filter`, or of every kind for `"*"`.
    pub fn naming_patterns(&self, kind_filter: &str) -> Result<Vec<&CompiledPattern>> {
        self.filter(&self.naming, kind_filter, "naming patterns")
    }

    /// Redaction patterns of `kind_filter`, or of every kind for `"*"`.
    pub fn redaction_patterns(&self, kind_filter: &str) -> Result<Vec<&CompiledPattern>> {
        self.filter(&self.redaction, kind_filter, "regexes")
    }

    fn filter<'a>(
        &self,
        patterns: &'a [CompiledPattern],
        kind_filter: &str,
        what: &'static str,
    ) -> Result<Vec<&'a CompiledPattern>> {
        let selected: Vec<&CompiledPattern> = patterns
            .iter()
            .filter(|p| kind_filter == WILDCARD_KIND || p.kind == kind_filter)
            .collect();

        if selected.is_empty() {
            return Err(AnonymizerError::NoPatternsFound {
                what,
                kind: kind_filter.to_string(),
                version: self.version.clone(),
            });
        }
        Ok(selected)
    }
}

/// Checks that every kind is non-empty and unique within the version.
fn validate_log_kinds(config: &VersionedConfig) -> Result<()> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for (index, log_kind) in config.log_kinds.iter().enumerate() {
        if log_kind.kind.is_empty() {
            errors.push(format!("Log entry #{} has an empty `kind` field.", index + 1));
        } else if log_kind.kind == WILDCARD_KIND {
            errors.push(format!("Kind '{}' is reserved for selecting every kind.", WILDCARD_KIND));
        } else if !seen.insert(log_kind.kind.as_str()) {
            errors.push(format!("Duplicate kind found: '{}'.", log_kind.kind));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AnonymizerError::InvalidConfig {
            version: config.version.clone(),
            details: errors.join("\n"),
        })
    }
}
