//! Terminal output helpers: status messages on stderr and pattern tables.

pub mod output_format;
pub mod table;
