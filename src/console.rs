//! Console output lines.
//!
//! The calling service scrapes these lines (notably `[INFO] Preview URL:`),
//! so their prefixes are part of the command's interface. Structured
//! diagnostics go through `tracing` instead.

use std::fmt::Display;

/// Prefix of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    pub fn prefix(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Success => "[SUCCESS]",
            Level::Error => "[ERROR]",
        }
    }
}

/// Format a console line without printing it.
pub fn line(level: Level, message: impl Display) -> String {
    format!("{} {}", level.prefix(), message)
}

/// Print an `[INFO]` line to stdout.
pub fn info(message: impl Display) {
    println!("{}", line(Level::Info, message));
}

/// Print a `[SUCCESS]` line to stdout.
pub fn success(message: impl Display) {
    println!("{}", line(Level::Success, message));
}

/// Print an `[ERROR]` line to stderr.
pub fn error(message: impl Display) {
    eprintln!("{}", line(Level::Error, message));
}
