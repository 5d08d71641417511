//! Pattern handling for log-anonymizer.
//!
//! Naming and redaction patterns share one compiled representation,
//! [`compiler::CompiledPattern`], which remembers the kind that declared it
//! and the source text it was built from.

pub mod compiler;
