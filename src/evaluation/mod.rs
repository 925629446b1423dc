//! The evaluation engine: pull state from a [`PrometheusApi`], classify every
//! item and reduce the verdicts to one [`Report`].
//!
//! All inputs are validated before the backend is contacted, so a bad
//! threshold or exclude pattern never costs a network round trip.

pub mod health;
pub mod rules;
pub mod samples;
pub mod threshold;

pub use health::Probe;
pub use rules::RuleFilter;
pub use threshold::Threshold;

use chrono::Utc;
use tracing::debug;

use crate::core::errors::ProbeResult;
use crate::core::traits::PrometheusApi;
use crate::core::types::Severity;
use crate::format::report::Report;

#[derive(Debug, Clone)]
pub struct AlertOptions {
    pub names: Vec<String>,
    pub groups: Vec<String>,
    pub exclude: Vec<String>,
    pub problems_only: bool,
    pub no_alerts_state: Severity,
    pub show_all: bool,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            groups: Vec::new(),
            exclude: Vec::new(),
            problems_only: false,
            no_alerts_state: Severity::Ok,
            show_all: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub query: String,
    pub warning: String,
    pub critical: String,
    pub show_all: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct HealthOptions {
    pub probe: Probe,
    pub info: bool,
}

pub struct Evaluator<A> {
    api: A,
}

impl<A: PrometheusApi> Evaluator<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn evaluate_alerts(&self, options: &AlertOptions) -> ProbeResult<Report> {
        let filter = RuleFilter::new(
            options.names.clone(),
            options.groups.clone(),
            &options.exclude,
            options.problems_only,
        )?;

        let rules = self.api.rules().await?;
        debug!(count = rules.len(), "fetched alerting rules");

        Ok(rules::assess(
            &rules,
            &filter,
            options.no_alerts_state,
            options.show_all,
        ))
    }

    pub async fn evaluate_query(&self, options: &QueryOptions) -> ProbeResult<Report> {
        let warning = Threshold::parse(&options.warning)?;
        let critical = Threshold::parse(&options.critical)?;

        let response = self.api.query(&options.query, Utc::now()).await?;
        debug!(kind = response.result.kind(), query = %options.query, "query evaluated");

        samples::assess(&response, &warning, &critical, options.show_all)
    }

    pub async fn evaluate_health(&self, options: &HealthOptions) -> ProbeResult<Report> {
        let response = self.api.probe(options.probe).await?;
        debug!(status = response.status, probe = %options.probe, "endpoint answered");

        let info = if options.info {
            Some(self.api.build_info().await?)
        } else {
            None
        };

        Ok(health::assess(options.probe, &response, info.as_ref()))
    }
}
