use async_trait::async_trait;

use crate::cli::args::AlertArgs;
use crate::cli::commands::Command;
use crate::core::errors::ProbeResult;
use crate::core::traits::PrometheusApi;
use crate::core::types::Severity;
use crate::evaluation::{AlertOptions, Evaluator, RuleFilter};
use crate::format::report::Report;

#[derive(Debug, Clone)]
pub struct AlertCommand {
    options: AlertOptions,
}

impl AlertCommand {
    /// Fails on an invalid `--no-alerts-state` or exclude pattern.
    pub fn new(args: &AlertArgs) -> ProbeResult<Self> {
        let no_alerts_state: Severity = args.no_alerts_state.parse()?;
        RuleFilter::new(Vec::new(), Vec::new(), &args.exclude, false)?;

        Ok(Self {
            options: AlertOptions {
                names: args.names.clone(),
                groups: args.groups.clone(),
                exclude: args.exclude.clone(),
                problems_only: args.problems_only,
                no_alerts_state,
                show_all: args.show_all,
            },
        })
    }

    pub fn options(&self) -> &AlertOptions {
        &self.options
    }
}

#[async_trait]
impl Command for AlertCommand {
    async fn execute<A>(&self, evaluator: &Evaluator<A>) -> ProbeResult<Report>
    where
        A: PrometheusApi,
    {
        evaluator.evaluate_alerts(&self.options).await
    }
}
