use crate::core::errors::ProbeResult;
use crate::evaluation::health::{BuildInfo, HealthResponse, Probe};
use crate::evaluation::rules::AlertRule;
use crate::evaluation::samples::QueryResponse;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The backend collaborator the evaluation engine pulls state from.
///
/// Implementations own transport, TLS and authentication. They hand back
/// already-decoded domain values; recording rules never cross this boundary.
#[async_trait]
pub trait PrometheusApi: Send + Sync {
    /// All alerting rules of all rule groups, in backend order
    async fn rules(&self) -> ProbeResult<Vec<AlertRule>>;

    /// Evaluate an instant query at the given time
    async fn query(&self, query: &str, at: DateTime<Utc>) -> ProbeResult<QueryResponse>;

    /// Hit the health or readiness endpoint
    async fn probe(&self, probe: Probe) -> ProbeResult<HealthResponse>;

    /// Server build information
    async fn build_info(&self) -> ProbeResult<BuildInfo>;
}
