//! Alerting rule classification and the alert filter policy.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::core::constants::{empty_texts, labels};
use crate::core::errors::{ProbeError, ProbeResult};
use crate::core::types::{Severity, Verdict};
use crate::format::report::{Aggregator, Report, ReportTemplate};

/// State of an alerting rule as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertState {
    Inactive,
    Pending,
    Firing,
    /// Anything the backend may add later
    Other(String),
}

impl AlertState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "inactive" => AlertState::Inactive,
            "pending" => AlertState::Pending,
            "firing" => AlertState::Firing,
            other => AlertState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AlertState::Inactive => "inactive",
            AlertState::Pending => "pending",
            AlertState::Firing => "firing",
            AlertState::Other(s) => s,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AlertState::Inactive => Severity::Ok,
            AlertState::Pending => Severity::Warning,
            AlertState::Firing => Severity::Critical,
            AlertState::Other(_) => Severity::Unknown,
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One active (pending or firing) occurrence of an alerting rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertInstance {
    pub labels: BTreeMap<String, String>,
    /// Current value, in the backend's textual float representation
    pub value: String,
}

impl AlertInstance {
    /// Numeric value, NaN when the backend sent something unparseable.
    pub fn numeric_value(&self) -> f64 {
        self.value.trim().parse().unwrap_or(f64::NAN)
    }
}

/// An alerting rule together with its owning group and active instances.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRule {
    pub name: String,
    pub group: String,
    pub state: AlertState,
    pub instances: Vec<AlertInstance>,
}

/// Classify a rule, or one of its active instances when given.
pub fn classify(rule: &AlertRule, instance: Option<&AlertInstance>) -> Verdict {
    let severity = rule.state.severity();
    let Some(instance) = instance else {
        return Verdict::new(severity, format!("[{}] is {}", rule.name, rule.state));
    };

    let mut text = format!("[{}]", rule.name);
    if let Some(job) = instance.labels.get(labels::JOB) {
        text.push_str(&format!(" - Job: [{job}]"));
    }
    if let Some(target) = instance.labels.get(labels::INSTANCE) {
        text.push_str(&format!(" on Instance: [{target}]"));
    }
    text.push_str(&format!(
        " is {} - value: {:.2}",
        rule.state,
        instance.numeric_value()
    ));

    Verdict::new(severity, text)
}

/// Which rules end up in the alert report.
///
/// Exclude patterns are compiled up front so a malformed one fails the
/// invocation before the backend is contacted.
#[derive(Debug, Clone, Default)]
pub struct RuleFilter {
    names: Vec<String>,
    groups: Vec<String>,
    exclude: Vec<Regex>,
    problems_only: bool,
}

impl RuleFilter {
    pub fn new(
        names: Vec<String>,
        groups: Vec<String>,
        exclude: &[String],
        problems_only: bool,
    ) -> ProbeResult<Self> {
        let exclude = exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ProbeError::InvalidRegex {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<ProbeResult<Vec<_>>>()?;

        Ok(Self {
            names,
            groups,
            exclude,
            problems_only,
        })
    }

    pub fn has_name_filter(&self) -> bool {
        !self.names.is_empty()
    }

    fn in_groups(&self, rule: &AlertRule) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| *g == rule.group)
    }

    fn named(&self, rule: &AlertRule) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| *n == rule.name)
    }

    fn excluded(&self, rule: &AlertRule) -> bool {
        self.exclude.iter().any(|re| re.is_match(&rule.name))
    }
}

/// Reduce the backend's alerting rules to one report.
///
/// Empty outcomes are told apart: a name filter that matches no rule is
/// UNKNOWN, while an empty rule set or everything being filtered away falls
/// back to `no_alerts_state`.
pub fn assess(
    rules: &[AlertRule],
    filter: &RuleFilter,
    no_alerts_state: Severity,
    show_all: bool,
) -> Report {
    let in_groups: Vec<&AlertRule> = rules.iter().filter(|r| filter.in_groups(r)).collect();
    let named: Vec<&AlertRule> = in_groups.iter().copied().filter(|r| filter.named(r)).collect();

    if named.is_empty() {
        let (template, default) = if filter.has_name_filter() {
            (ReportTemplate::alerts(empty_texts::NO_SUCH_ALERT), Severity::Unknown)
        } else {
            (ReportTemplate::alerts(empty_texts::NO_ALERTS_DEFINED), no_alerts_state)
        };
        debug!(rules = rules.len(), in_groups = in_groups.len(), "no alerting rule matched");
        return Aggregator::new(template, default).show_all(show_all).finalize();
    }

    let mut aggregator = Aggregator::new(
        ReportTemplate::alerts(empty_texts::NO_ALERTS_RETRIEVED),
        no_alerts_state,
    )
    .show_all(show_all);

    for rule in named {
        if filter.excluded(rule) {
            debug!(rule = %rule.name, "rule excluded by pattern");
            continue;
        }
        if rule.instances.is_empty() {
            if filter.problems_only {
                debug!(rule = %rule.name, "skipping rule without active instances");
                continue;
            }
            aggregator.add_verdict(classify(rule, None));
        } else {
            for instance in &rule.instances {
                aggregator.add_verdict(classify(rule, Some(instance)));
            }
        }
    }

    aggregator.finalize()
}
