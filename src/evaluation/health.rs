//! Health and readiness endpoint classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::constants::{empty_texts, endpoints, health_bodies};
use crate::core::types::{Severity, Verdict};
use crate::format::perfdata::Perfdata;
use crate::format::report::{Aggregator, Report, ReportTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Healthy,
    Ready,
}

impl Probe {
    pub fn endpoint(self) -> &'static str {
        match self {
            Probe::Healthy => endpoints::HEALTHY,
            Probe::Ready => endpoints::READY,
        }
    }

    /// Body a working server answers with.
    pub fn expected_body(self) -> &'static str {
        match self {
            Probe::Healthy => health_bodies::HEALTHY,
            Probe::Ready => health_bodies::READY,
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Healthy => f.write_str("health"),
            Probe::Ready => f.write_str("readiness"),
        }
    }
}

/// Raw answer of a health or readiness endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    pub revision: String,
    pub branch: String,
    pub build_user: String,
    pub build_date: String,
    #[serde(default)]
    pub go_version: Option<String>,
}

/// 200 with the expected body is OK, any other status is CRITICAL and a
/// 200 with an unexpected body is UNKNOWN.
pub fn classify(probe: Probe, response: &HealthResponse) -> Verdict {
    let body = response.body.trim();
    let severity = match response.status {
        200 if body == probe.expected_body() => Severity::Ok,
        200 => Severity::Unknown,
        _ => Severity::Critical,
    };

    let text = if body.is_empty() {
        format!("{probe} endpoint returned HTTP {}", response.status)
    } else {
        body.to_string()
    };

    Verdict::new(severity, text).with_perfdata(Perfdata::new("statuscode", f64::from(response.status)))
}

pub fn assess(probe: Probe, response: &HealthResponse, info: Option<&BuildInfo>) -> Report {
    let mut aggregator = Aggregator::new(
        ReportTemplate::single(empty_texts::NO_STATUS_INFORMATION),
        Severity::Unknown,
    );
    aggregator.add_verdict(classify(probe, response));

    if let Some(info) = info {
        aggregator.add_detail("Prometheus Server information");
        aggregator.add_detail(format!("Version: {}", info.version));
        aggregator.add_detail(format!("Branch: {}", info.branch));
        aggregator.add_detail(format!("BuildDate: {}", info.build_date));
        aggregator.add_detail(format!("BuildUser: {}", info.build_user));
        aggregator.add_detail(format!("Revision: {}", info.revision));
        if let Some(go) = &info.go_version {
            aggregator.add_detail(format!("GoVersion: {go}"));
        }
    }

    aggregator.finalize()
}
