//! Command-line entry point: parse arguments, resolve connection settings,
//! run one check under the watchdog and print the plugin output.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConnectionArgs};
pub use commands::{CheckCommand, Command};

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::time::Duration;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::client::PrometheusClient;
use crate::config::ConnectionConfig;
use crate::core::errors::{ProbeError, ProbeResult};
use crate::core::traits::PrometheusApi;
use crate::evaluation::Evaluator;
use crate::format::report::Report;

/// Run the plugin and return its exit code.
pub async fn run_cli() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_error(err),
    };

    init_logging(cli.verbose);

    let report = match run(cli).await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "check failed");
            Report::unknown(err.to_string())
        }
    };

    println!("{report}");
    report.exit_code()
}

/// Evaluate the parsed command line into a report.
pub async fn run(cli: Cli) -> Result<Report> {
    let command = CheckCommand::from_args(&cli.command)?;

    let mut config = ConnectionConfig::load(cli.config.as_deref()).await?;
    config.apply_overrides(cli.connection.into());
    debug!(base_url = %config.base_url(), timeout = config.timeout_secs, "connection settings resolved");

    let client = PrometheusClient::from_config(&config)?;
    let evaluator = Evaluator::new(client);

    Ok(run_with(&command, &evaluator, config.timeout()).await?)
}

/// Execute one check under the overall watchdog.
pub async fn run_with<A>(
    command: &CheckCommand,
    evaluator: &Evaluator<A>,
    timeout: Duration,
) -> ProbeResult<Report>
where
    A: PrometheusApi,
{
    match tokio::time::timeout(timeout, command.execute(evaluator)).await {
        Ok(report) => report,
        Err(_) => Err(ProbeError::Timeout(timeout.as_secs())),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "promcheck=debug" } else { "promcheck=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Help and version go to stdout with exit 0; every other parse failure is
/// an UNKNOWN check result.
fn usage_error(err: clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            0
        }
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = err.print();
            let report = Report::unknown(MISSING_CHECK);
            println!("{report}");
            report.exit_code()
        }
        _ => {
            let report = Report::unknown(usage_message(&err));
            println!("{report}");
            report.exit_code()
        }
    }
}

const MISSING_CHECK: &str = "no check given, expected one of: alert, query, health";

/// The clap message on one line, without usage and tips.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let message = rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("Usage:"))
        .filter(|line| !line.is_empty() && !line.starts_with("tip:"))
        .collect::<Vec<_>>()
        .join(" ");
    message
        .strip_prefix("error: ")
        .unwrap_or(&message)
        .to_string()
}
