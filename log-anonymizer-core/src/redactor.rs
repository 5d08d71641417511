//! Capture-group scoped redaction of a single line.
//!
//! A redaction pattern describes context and sensitive parts at once: the
//! whole match anchors the rule, only its capturing groups are obfuscated.
//! `user=(\w+)@(\w+)` therefore hides the user and the host while `=` and `@`
//! stay visible.
//!
//! Within one match, each non-empty group replaces the *first textual
//! occurrence* of its text inside the (already partly rewritten) matched
//! text. When a group's text also appears earlier in the match as a literal,
//! that literal is the one obfuscated.

use log::{log_enabled, Level};

use crate::patterns::compiler::CompiledPattern;
use crate::redaction_match::log_redaction_action_debug;

/// Replacement token used when none is configured.
pub const DEFAULT_OBFUSCATION: &str = "[*CONFIDENTIAL*]";

/// Applies redaction patterns to lines, substituting a fixed token.
///
/// Lines are raw bytes. Nothing is decoded, so bytes outside the captured
/// groups are copied through even when the line is not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
    obfuscation: String,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_OBFUSCATION)
    }
}

impl Redactor {
    pub fn new(obfuscation: impl Into<String>) -> Self {
        Self {
            obfuscation: obfuscation.into(),
        }
    }

    pub fn obfuscation(&self) -> &str {
        &self.obfuscation
    }

    /// Redacts `line` with every pattern, in order.
    ///
    /// Each pattern sees the output of the previous one. Matches are
    /// non-overlapping and scanned left to right.
    pub fn redact<'p, I>(&self, line: &[u8], patterns: I) -> Vec<u8>
    where
        I: IntoIterator<Item = &'p CompiledPattern>,
    {
        let mut current = line.to_vec();
        for pattern in patterns {
            if pattern.group_count() == 0 {
                continue;
            }
            if let Some(rewritten) = self.apply(&current, pattern) {
                current = rewritten;
            }
        }
        current
    }

    /// Applies one pattern; `None` when it does not match at all.
    fn apply(&self, line: &[u8], pattern: &CompiledPattern) -> Option<Vec<u8>> {
        let token = self.obfuscation.as_bytes();
        let mut out = Vec::with_capacity(line.len());
        let mut last_end = 0usize;
        let mut matched_any = false;

        for caps in pattern.regex.captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            matched_any = true;

            let mut rewritten = whole.as_bytes().to_vec();
            for group in caps.iter().skip(1).flatten() {
                let text = group.as_bytes();
                // An empty group must never introduce the token.
                if text.is_empty() {
                    continue;
                }
                if let Some(pos) = find(&rewritten, text) {
                    rewritten.splice(pos..pos + text.len(), token.iter().copied());
                }
            }

            if log_enabled!(Level::Debug) {
                log_redaction_action_debug(&pattern.kind, &pattern.source, whole.as_bytes(), &rewritten);
            }

            out.extend_from_slice(&line[last_end..whole.start()]);
            out.extend_from_slice(&rewritten);
            last_end = whole.end();
        }

        if !matched_any {
            return None;
        }
        out.extend_from_slice(&line[last_end..]);
        Some(out)
    }
}

/// Offset of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
