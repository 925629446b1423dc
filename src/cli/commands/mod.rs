use async_trait::async_trait;

pub mod alert;
pub mod health;
pub mod query;

pub use alert::AlertCommand;
pub use health::HealthCommand;
pub use query::QueryCommand;

use crate::cli::args::Commands;
use crate::core::errors::ProbeResult;
use crate::core::traits::PrometheusApi;
use crate::evaluation::Evaluator;
use crate::format::report::Report;

/// Trait for CLI check implementations
#[async_trait]
pub trait Command: Send + Sync {
    /// Run the check against the backend behind `evaluator`
    async fn execute<A>(&self, evaluator: &Evaluator<A>) -> ProbeResult<Report>
    where
        A: PrometheusApi;
}

/// The parsed subcommand, with its own inputs already validated.
#[derive(Debug, Clone)]
pub enum CheckCommand {
    Alert(AlertCommand),
    Query(QueryCommand),
    Health(HealthCommand),
}

impl CheckCommand {
    pub fn from_args(command: &Commands) -> ProbeResult<Self> {
        Ok(match command {
            Commands::Alert(args) => CheckCommand::Alert(AlertCommand::new(args)?),
            Commands::Query(args) => CheckCommand::Query(QueryCommand::new(args)?),
            Commands::Health(args) => CheckCommand::Health(HealthCommand::new(args)),
        })
    }
}

#[async_trait]
impl Command for CheckCommand {
    async fn execute<A>(&self, evaluator: &Evaluator<A>) -> ProbeResult<Report>
    where
        A: PrometheusApi,
    {
        match self {
            CheckCommand::Alert(cmd) => cmd.execute(evaluator).await,
            CheckCommand::Query(cmd) => cmd.execute(evaluator).await,
            CheckCommand::Health(cmd) => cmd.execute(evaluator).await,
        }
    }
}
