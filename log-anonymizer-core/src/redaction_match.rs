//! Debug trace of rewritten matches.
//!
//! Debug output tends to travel with the logs being anonymized, so the
//! matched text itself is only shown when `LOG_ANONYMIZER_ALLOW_DEBUG_PII`
//! is set to `true`. Otherwise only its length is reported.

use lazy_static::lazy_static;
use log::debug;

lazy_static! {
    static ref SHOW_MATCHED_TEXT: bool = std::env::var("LOG_ANONYMIZER_ALLOW_DEBUG_PII")
        .is_ok_and(|v| v.eq_ignore_ascii_case("true"));
}

/// Logs one rewritten match at debug level.
///
/// `original` is masked as `<N bytes hidden>` unless matched text may be shown.
/// The rewritten text carries the obfuscation token and is always printed.
pub fn log_redaction_action_debug(kind: &str, pattern: &str, original: &[u8], rewritten: &[u8]) {
    let before = if *SHOW_MATCHED_TEXT {
        String::from_utf8_lossy(original).into_owned()
    } else {
        hidden(original)
    };
    debug!(
        "[{}] '{}' rewrote {} -> '{}'",
        kind,
        pattern,
        before,
        String::from_utf8_lossy(rewritten)
    );
}

fn hidden(text: &[u8]) -> String {
    format!("<{} bytes hidden>", text.len())
}
