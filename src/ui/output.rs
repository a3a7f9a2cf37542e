//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! The changelog itself goes to stdout and is always printed. Everything
//! else (progress, warnings, diagnostics) goes to stderr and respects the
//! verbosity flags, so stdout can be piped into a file or another tool.

use std::fmt::Display;

use tracing::Level;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - info and warnings
    Normal,
    /// Verbose mode - debug diagnostics
    Verbose,
}

impl Verbosity {
    /// Create verbosity from flags. `--quiet` wins over `--verbose`.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Default `tracing` level for this verbosity.
    pub fn tracing_level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::DEBUG,
        }
    }
}

/// Print the primary result to stdout (always shown).
pub fn print(message: impl Display) {
    println!("{}", message);
}

/// Print an informational message (respects quiet mode).
pub fn info(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("{}", message);
    }
}

/// Print a debug message (only in verbose mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Verbose {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Indent `items` under a heading, one per line.
pub fn format_fields<K: Display, V: Display>(heading: &str, items: &[(K, V)]) -> String {
    let mut out = format!("{}:", heading);
    for (key, value) in items {
        out.push_str(&format!("\n  {}: {}", key, value));
    }
    out
}
