//! `listNamingPatterns`, `listRegexPatterns` and `listKinds`.

use anyhow::{Result, bail};
use std::io::Write;

use log_anonymizer_core::ConfigStore;

use crate::ui::table::{kinds_table, patterns_table};

pub fn list_naming_patterns<W: Write>(store: &ConfigStore, kind: &str, out: &mut W) -> Result<()> {
    let patterns = store.naming_patterns(kind)?;
    writeln!(out, "{}", patterns_table(&patterns))?;
    Ok(())
}

pub fn list_regex_patterns<W: Write>(store: &ConfigStore, kind: &str, out: &mut W) -> Result<()> {
    let patterns = store.redaction_patterns(kind)?;
    writeln!(out, "{}", patterns_table(&patterns))?;
    Ok(())
}

pub fn list_kinds<W: Write>(store: &ConfigStore, out: &mut W) -> Result<()> {
    let kinds = store.kinds();
    if kinds.is_empty() {
        bail!("no log types found for {}", store.version());
    }
    writeln!(out, "{}", kinds_table(&kinds))?;
    Ok(())
}
