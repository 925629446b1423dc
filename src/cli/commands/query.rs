use async_trait::async_trait;

use crate::cli::args::QueryArgs;
use crate::cli::commands::Command;
use crate::core::errors::ProbeResult;
use crate::core::traits::PrometheusApi;
use crate::evaluation::{Evaluator, QueryOptions, Threshold};
use crate::format::report::Report;

#[derive(Debug, Clone)]
pub struct QueryCommand {
    options: QueryOptions,
}

impl QueryCommand {
    /// Fails on a malformed threshold.
    pub fn new(args: &QueryArgs) -> ProbeResult<Self> {
        Threshold::parse(&args.warning)?;
        Threshold::parse(&args.critical)?;

        Ok(Self {
            options: QueryOptions {
                query: args.query.clone(),
                warning: args.warning.clone(),
                critical: args.critical.clone(),
                show_all: args.show_all,
            },
        })
    }
}

#[async_trait]
impl Command for QueryCommand {
    async fn execute<A>(&self, evaluator: &Evaluator<A>) -> ProbeResult<Report>
    where
        A: PrometheusApi,
    {
        evaluator.evaluate_query(&self.options).await
    }
}
