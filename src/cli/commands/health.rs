use async_trait::async_trait;

use crate::cli::args::HealthArgs;
use crate::cli::commands::Command;
use crate::core::errors::ProbeResult;
use crate::core::traits::PrometheusApi;
use crate::evaluation::{Evaluator, HealthOptions, Probe};
use crate::format::report::Report;

#[derive(Debug, Clone, Copy)]
pub struct HealthCommand {
    options: HealthOptions,
}

impl HealthCommand {
    pub fn new(args: &HealthArgs) -> Self {
        let probe = if args.ready { Probe::Ready } else { Probe::Healthy };
        Self {
            options: HealthOptions {
                probe,
                info: args.info,
            },
        }
    }
}

#[async_trait]
impl Command for HealthCommand {
    async fn execute<A>(&self, evaluator: &Evaluator<A>) -> ProbeResult<Report>
    where
        A: PrometheusApi,
    {
        evaluator.evaluate_health(&self.options).await
    }
}
