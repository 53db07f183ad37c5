//! Command-line interface for godfather-mailer using clap.

use clap::{Parser, ValueEnum};

/// Diagnostic log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format for log aggregation.
    Json,
}

/// Send a The Godfather: Office Mafia notification email.
#[derive(Parser, Debug)]
#[command(name = "godfather-mailer")]
#[command(version)]
#[command(about = "Send a The Godfather: Office Mafia notification email")]
pub struct Cli {
    /// JSON payload, e.g. '{"type":"day_start","day":3,"recipients":["a@x.com"]}'.
    // Optional so a missing payload exits 1 as a usage error, not clap's 2.
    pub payload: Option<String>,

    /// Render the email and print it instead of sending.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}
