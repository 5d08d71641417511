//! compiler.rs - Eager compilation of naming and redaction patterns.
//!
//! Every pattern of the activated version is compiled exactly once. Broken
//! patterns never abort activation: they are collected and reported together
//! so the operator sees every offender in one warning.
//!
//! Patterns are byte-oriented (`regex::bytes`). Log lines are not required to
//! be valid UTF-8, and bytes a pattern does not touch must survive as they are.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use regex::bytes::{Regex, RegexBuilder};

use crate::config::LogKind;
use crate::errors::{AnonymizerError, Result};

/// Upper bound for the compiled program of a single pattern.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A pattern ready for matching, tagged with the kind that declared it.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// The `kind` of the `LogKind` this pattern belongs to.
    pub kind: String,
    /// The pattern exactly as written in the configuration.
    pub source: String,
    /// The compiled regular expression.
    pub regex: Regex,
}

impl CompiledPattern {
    /// Returns true if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text.as_bytes())
    }

    /// Number of explicit capturing groups (group 0 excluded).
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }
}

/// Result of compiling every pattern of a version.
///
/// Both pattern lists keep declaration order: kinds in the order of the
/// configuration, and within a kind the order of its pattern list.
#[derive(Debug, Default)]
pub struct CompiledCatalogue {
    pub naming: Vec<CompiledPattern>,
    pub redaction: Vec<CompiledPattern>,
    pub failures: Vec<AnonymizerError>,
}

/// Compiles a single pattern for `kind`.
///
/// The only bound is the size of the compiled program; the length of the
/// source text is not limited.
pub fn compile_pattern(kind: &str, source: &str) -> Result<CompiledPattern> {
    let regex = RegexBuilder::new(source)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| AnonymizerError::PatternCompile {
            kind: kind.to_string(),
            pattern: source.to_string(),
            source: e,
        })?;

    Ok(CompiledPattern {
        kind: kind.to_string(),
        source: source.to_string(),
        regex,
    })
}

/// Compiles the naming and redaction patterns of every `LogKind`.
pub fn compile_log_kinds(log_kinds: &[LogKind]) -> CompiledCatalogue {
    let mut catalogue = CompiledCatalogue::default();

    for log_kind in log_kinds {
        for source in &log_kind.naming_patterns {
            match compile_pattern(&log_kind.kind, source) {
                Ok(p) => catalogue.naming.push(p),
                Err(e) => catalogue.failures.push(e),
            }
        }
        for source in &log_kind.redaction_patterns {
            match compile_pattern(&log_kind.kind, source) {
                Ok(p) => {
                    if p.group_count() == 0 {
                        debug!(
                            "Redaction pattern '{}' of kind '{}' has no capturing group and will not change any line.",
                            p.source, p.kind
                        );
                    }
                    catalogue.redaction.push(p);
                }
                Err(e) => catalogue.failures.push(e),
            }
        }
    }

    debug!(
        "Compiled {} naming and {} redaction patterns ({} rejected).",
        catalogue.naming.len(),
        catalogue.redaction.len(),
        catalogue.failures.len()
    );
    catalogue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str, naming: &[&str], redaction: &[&str]) -> LogKind {
        LogKind {
            kind: name.to_string(),
            naming_patterns: naming.iter().map(|s| s.to_string()).collect(),
            redaction_patterns: redaction.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_invalid_pattern_is_collected_not_fatal() {
        let kinds = vec![kind("engine", &[r"^engine-\d+\.log$", "(unclosed"], &[r"user=(\w+)"])];
        let catalogue = compile_log_kinds(&kinds);

        assert_eq!(catalogue.naming.len(), 1);
        assert_eq!(catalogue.redaction.len(), 1);
        assert_eq!(catalogue.failures.len(), 1);
        assert!(matches!(
            catalogue.failures[0],
            AnonymizerError::PatternCompile { ref pattern, .. } if pattern == "(unclosed"
        ));
    }

    #[test]
    fn test_long_valid_pattern_is_kept() {
        let alternation = vec!["zz"; 390].join("|");
        let source = format!(r"user=(\w+)(?:{})?", alternation);
        assert!(source.len() > 700);

        let kinds = vec![kind("engine", &[], &[&source])];
        let catalogue = compile_log_kinds(&kinds);
        assert!(catalogue.failures.is_empty());
        assert_eq!(catalogue.redaction.len(), 1);
        assert_eq!(catalogue.redaction[0].group_count(), 1);
    }

    #[test]
    fn test_oversized_program_is_rejected() {
        // Counted repetitions of a Unicode class blow past the program size limit.
        let err = compile_pattern("engine", r"(\w{1000}){1000}").unwrap_err();
        assert!(matches!(err, AnonymizerError::PatternCompile { .. }));
    }

    #[test]
    fn test_group_count() {
        assert_eq!(compile_pattern("k", r"host=(\w+):(\d+)").unwrap().group_count(), 2);
        assert_eq!(compile_pattern("k", r"password").unwrap().group_count(), 0);
        assert_eq!(compile_pattern("k", r"(?:a)(b)").unwrap().group_count(), 1);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let kinds = vec![
            kind("a", &["a1", "a2"], &["(x)"]),
            kind("b", &["b1"], &["(y)", "(z)"]),
        ];
        let catalogue = compile_log_kinds(&kinds);
        let naming: Vec<_> = catalogue.naming.iter().map(|p| p.source.as_str()).collect();
        let redaction: Vec<_> = catalogue.redaction.iter().map(|p| p.source.as_str()).collect();
        assert_eq!(naming, vec!["a1", "a2", "b1"]);
        assert_eq!(redaction, vec!["(x)", "(y)", "(z)"]);
    }
}
