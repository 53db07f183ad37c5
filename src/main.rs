//! godfather-mailer - Notification emails for The Godfather: Office Mafia.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use godfather_mailer::cli::{Cli, LogFormat};
use godfather_mailer::{MailerConfig, MailerError, console};

/// Initialize the tracing subscriber with the specified log format.
///
/// Diagnostics default to `warn` so the `[INFO]` console lines stay
/// readable; `RUST_LOG` raises the level.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    // Single sequential flow: a current-thread runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Err(e) = runtime.block_on(execute(&cli)) {
        // The `[ERROR]` line is the one stderr report callers read.
        debug!(kind = e.kind(), error = %e, "Mailer run failed");
        console::error(&e);
        std::process::exit(1);
    }

    Ok(())
}

async fn execute(cli: &Cli) -> Result<(), MailerError> {
    if cli.payload.is_none() {
        return Err(MailerError::Usage);
    }
    let config = MailerConfig::from_env()?;
    godfather_mailer::run(&config, cli.payload.as_deref(), cli.dry_run).await?;
    Ok(())
}
