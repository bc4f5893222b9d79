//! Chartseal - integrity seal for the bundled Chartloop component library
//!
//! Main entry point: parses flags, installs logging and dispatches to the seal commands

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

mod seal_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "chartseal",
    about = "Integrity seal for the bundled Chartloop component library",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: seal_cli::SealCommand,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,
}

/// Initialize tracing with CLI flags
///
/// Logs go to stderr so fingerprints printed on stdout stay pipeable.
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    cli.command.execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_is_global() {
        let cli = Cli::try_parse_from(["chartseal", "manifest", "--log-level", "debug"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.log_level.to_filter_directive(), "debug");
    }

    #[test]
    fn test_default_log_level() {
        let cli = Cli::try_parse_from(["chartseal", "manifest"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Warn));
    }
}
