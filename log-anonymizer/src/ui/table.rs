//! Tabular listings of the active configuration.

use comfy_table::{presets, CellAlignment, Table};

use log_anonymizer_core::CompiledPattern;

fn base_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING).set_header(header);
    if let Some(index_column) = table.column_mut(0) {
        index_column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

/// `#`, `Kind`, `Pattern` rows, numbered from 1.
pub fn patterns_table(patterns: &[&CompiledPattern]) -> Table {
    let mut table = base_table(vec!["#", "Kind", "Pattern"]);
    for (i, pattern) in patterns.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), pattern.kind.clone(), pattern.source.clone()]);
    }
    table
}

/// `#`, `Kind` rows, numbered from 1.
pub fn kinds_table(kinds: &[&str]) -> Table {
    let mut table = base_table(vec!["#", "Kind"]);
    for (i, kind) in kinds.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), kind.to_string()]);
    }
    table
}
