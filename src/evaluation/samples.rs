//! Query result shapes and per-sample classification against thresholds.

use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::core::constants::empty_texts;
use crate::core::constants::labels::METRIC_NAME;
use crate::core::errors::{ProbeError, ProbeResult};
use crate::core::types::{Severity, Verdict};
use crate::evaluation::threshold::Threshold;
use crate::format::perfdata::{sanitize_label, Perfdata};
use crate::format::report::{Aggregator, Report, ReportTemplate};

pub type LabelSet = BTreeMap<String, String>;

/// A timestamped value in the backend's textual float representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub timestamp: f64,
    pub value: String,
}

impl Point {
    pub fn new(timestamp: f64, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    /// Numeric value. Understands the `NaN`/`+Inf`/`-Inf` spellings the
    /// backend uses and falls back to NaN for anything unparseable.
    pub fn numeric_value(&self) -> f64 {
        match self.value.trim() {
            "NaN" => f64::NAN,
            "+Inf" | "Inf" => f64::INFINITY,
            "-Inf" => f64::NEG_INFINITY,
            other => other.parse().unwrap_or(f64::NAN),
        }
    }
}

/// One instant-vector element.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: LabelSet,
    pub point: Point,
}

/// One range-vector element. Only the last point is ever evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: LabelSet,
    pub points: Vec<Point>,
}

impl Series {
    pub fn last_sample(&self) -> Option<Sample> {
        self.points.last().map(|point| Sample {
            labels: self.labels.clone(),
            point: point.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Vector(Vec<Sample>),
    Matrix(Vec<Series>),
    Scalar(Point),
    String(Point),
}

impl QueryResult {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryResult::Vector(_) => "vector",
            QueryResult::Matrix(_) => "matrix",
            QueryResult::Scalar(_) => "scalar",
            QueryResult::String(_) => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub result: QueryResult,
    pub warnings: Vec<String>,
}

/// `name{k="v", k2="v2"}` with labels sorted by name.
pub fn label_set_string(labels: &LabelSet) -> String {
    let name = labels.get(METRIC_NAME).map(String::as_str).unwrap_or("");
    let pairs: Vec<String> = labels
        .iter()
        .filter(|(k, _)| k.as_str() != METRIC_NAME)
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect();

    if pairs.is_empty() && !name.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{}}}", pairs.join(", "))
    }
}

/// Perfdata label: `value_<name>_<label values sorted by label name>`.
/// The name segment is left out for series without `__name__`.
pub fn perfdata_label(labels: &LabelSet) -> String {
    let mut raw = String::from("value");
    if let Some(name) = labels.get(METRIC_NAME).filter(|n| !n.is_empty()) {
        raw.push('_');
        raw.push_str(name);
    }
    for (_, value) in labels.iter().filter(|(k, _)| k.as_str() != METRIC_NAME) {
        raw.push('_');
        raw.push_str(value);
    }
    sanitize_label(&raw)
}

/// Suffix a repeated perfdata label with `_<n>` so every entry of one
/// report stays addressable.
fn disambiguate(seen: &mut HashMap<String, usize>, mut verdict: Verdict) -> Verdict {
    if let Some(perfdata) = verdict.perfdata.as_mut() {
        let count = seen.entry(perfdata.label.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            perfdata.label = format!("{}_{}", perfdata.label, count);
        }
    }
    verdict
}

/// Critical wins over warning. Unplottable values get no perfdata entry.
pub fn classify(sample: &Sample, warning: &Threshold, critical: &Threshold) -> Verdict {
    let value = sample.point.numeric_value();
    let severity = if critical.violates(value) {
        Severity::Critical
    } else if warning.violates(value) {
        Severity::Warning
    } else {
        Severity::Ok
    };

    let text = format!(
        "{} - value: {}",
        label_set_string(&sample.labels),
        sample.point.value
    );
    let verdict = Verdict::new(severity, text);

    if value.is_finite() {
        verdict.with_perfdata(
            Perfdata::new(perfdata_label(&sample.labels), value)
                .with_thresholds(warning.clone(), critical.clone()),
        )
    } else {
        verdict
    }
}

pub fn assess(
    response: &QueryResponse,
    warning: &Threshold,
    critical: &Threshold,
    show_all: bool,
) -> ProbeResult<Report> {
    let mut aggregator = Aggregator::new(
        ReportTemplate::metrics(empty_texts::NO_STATUS_INFORMATION),
        Severity::Unknown,
    )
    .show_all(show_all);
    let mut seen = HashMap::new();

    match &response.result {
        QueryResult::Vector(samples) => {
            for sample in samples {
                aggregator.add_verdict(disambiguate(&mut seen, classify(sample, warning, critical)));
            }
        }
        QueryResult::Matrix(series) => {
            for s in series {
                match s.last_sample() {
                    Some(sample) => aggregator.add_verdict(disambiguate(
                        &mut seen,
                        classify(&sample, warning, critical),
                    )),
                    None => {
                        warn!(series = %label_set_string(&s.labels), "range series without data points");
                        aggregator.add_verdict(Verdict::new(
                            Severity::Unknown,
                            format!("{} - no data points", label_set_string(&s.labels)),
                        ));
                    }
                }
            }
        }
        other @ (QueryResult::Scalar(_) | QueryResult::String(_)) => {
            return Err(ProbeError::UnsupportedResult { kind: other.kind() });
        }
    }

    if !response.warnings.is_empty() {
        for w in &response.warnings {
            warn!(warning = %w, "query returned a warning");
        }
        aggregator.add_note(format!("Warnings: [{}]", response.warnings.join(" ")));
    }

    Ok(aggregator.finalize())
}
