//! Wire shapes of the Prometheus HTTP API and their conversion into
//! evaluation types. Recording rules are dropped here and never reach the
//! classifiers.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::errors::ClientError;
use crate::evaluation::health::BuildInfo;
use crate::evaluation::rules::{AlertInstance, AlertRule, AlertState};
use crate::evaluation::samples::{Point, QueryResponse, QueryResult, Sample, Series};

/// `{"status": "...", "data": ..., "errorType": "...", "error": "...", "warnings": [...]}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    error_type: Option<String>,
    error: Option<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RulesData {
    groups: Vec<WireRuleGroup>,
}

#[derive(Debug, Deserialize)]
struct WireRuleGroup {
    name: String,
    #[serde(default)]
    rules: Vec<WireRule>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireRule {
    Alerting(WireAlertingRule),
    Recording(WireRecordingRule),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct WireAlertingRule {
    name: String,
    state: String,
    #[serde(default)]
    alerts: Vec<WireAlert>,
}

#[derive(Debug, Deserialize)]
struct WireRecordingRule {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireAlert {
    #[serde(default)]
    labels: BTreeMap<String, String>,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
enum WireQueryData {
    Vector(Vec<WireSample>),
    Matrix(Vec<WireSeries>),
    Scalar(WirePoint),
    String(WirePoint),
}

#[derive(Debug, Deserialize)]
struct WireSample {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: WirePoint,
}

#[derive(Debug, Deserialize)]
struct WireSeries {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    #[serde(default)]
    values: Vec<WirePoint>,
}

/// `[<unix seconds>, "<value>"]`
#[derive(Debug, Deserialize)]
struct WirePoint(f64, String);

impl From<WirePoint> for Point {
    fn from(WirePoint(timestamp, value): WirePoint) -> Self {
        Point { timestamp, value }
    }
}

impl From<WireQueryData> for QueryResult {
    fn from(data: WireQueryData) -> Self {
        match data {
            WireQueryData::Vector(samples) => QueryResult::Vector(
                samples
                    .into_iter()
                    .map(|s| Sample {
                        labels: s.metric,
                        point: s.value.into(),
                    })
                    .collect(),
            ),
            WireQueryData::Matrix(series) => QueryResult::Matrix(
                series
                    .into_iter()
                    .map(|s| Series {
                        labels: s.metric,
                        points: s.values.into_iter().map(Point::from).collect(),
                    })
                    .collect(),
            ),
            WireQueryData::Scalar(p) => QueryResult::Scalar(p.into()),
            WireQueryData::String(p) => QueryResult::String(p.into()),
        }
    }
}

fn flatten_rules(groups: Vec<WireRuleGroup>) -> Vec<AlertRule> {
    let mut rules = Vec::with_capacity(groups.iter().map(|g| g.rules.len()).sum());
    for group in groups {
        for rule in group.rules {
            match rule {
                WireRule::Alerting(r) => rules.push(AlertRule {
                    name: r.name,
                    group: group.name.clone(),
                    state: AlertState::parse(&r.state),
                    instances: r
                        .alerts
                        .into_iter()
                        .map(|a| AlertInstance {
                            labels: a.labels,
                            value: a.value,
                        })
                        .collect(),
                }),
                WireRule::Recording(r) => {
                    debug!(group = %group.name, rule = %r.name, "ignoring recording rule");
                }
                WireRule::Unsupported => {
                    debug!(group = %group.name, "ignoring rule of unsupported type");
                }
            }
        }
    }
    rules
}

/// Decode an API envelope, turning `status: error` into [`ClientError::Api`].
fn open_envelope<T: DeserializeOwned>(
    body: &[u8],
    context: &'static str,
) -> Result<(T, Vec<String>), ClientError> {
    let envelope: Envelope<T> =
        serde_json::from_slice(body).map_err(|source| ClientError::Decode { context, source })?;

    if envelope.status != "success" {
        return Err(ClientError::Api {
            error_type: envelope.error_type.unwrap_or_else(|| envelope.status.clone()),
            message: envelope.error.unwrap_or_default(),
        });
    }

    match envelope.data {
        Some(data) => Ok((data, envelope.warnings)),
        None => Err(ClientError::Api {
            error_type: "bad_response".to_string(),
            message: format!("{context} response carries no data"),
        }),
    }
}

pub fn decode_rules(body: &[u8]) -> Result<Vec<AlertRule>, ClientError> {
    let (data, _): (RulesData, _) = open_envelope(body, "rules")?;
    Ok(flatten_rules(data.groups))
}

pub fn decode_query(body: &[u8]) -> Result<QueryResponse, ClientError> {
    let (data, warnings): (WireQueryData, _) = open_envelope(body, "query")?;
    Ok(QueryResponse {
        result: data.into(),
        warnings,
    })
}

pub fn decode_build_info(body: &[u8]) -> Result<BuildInfo, ClientError> {
    let (info, _) = open_envelope(body, "buildinfo")?;
    Ok(info)
}
