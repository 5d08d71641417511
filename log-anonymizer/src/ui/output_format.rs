//! Formatting of fatal error messages.
//!
//! Messages go to stderr so that stdout only carries listings. Colour is used
//! when the destination is a terminal.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes `Error: <msg>`.
pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, use_color: bool) -> io::Result<()> {
    if use_color {
        writeln!(writer, "{} {}", "Error:".red().bold(), msg)
    } else {
        writeln!(writer, "Error: {}", msg)
    }
}

/// Prints an error message to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let use_color = io::stderr().is_terminal();
    let _ = print_error_message(&mut io::stderr(), msg.as_ref(), use_color);
}
