use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::errors::ProbeError;
use crate::format::perfdata::Perfdata;

/// Outcome level of a check, as understood by Nagios-compatible monitoring systems.
///
/// Ordering follows *precedence*, not the numeric plugin exit code: a report is
/// as bad as its worst item and `Unknown` outranks everything else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Ok,
        Severity::Warning,
        Severity::Critical,
        Severity::Unknown,
    ];

    /// Position in the precedence chain OK < WARNING < CRITICAL < UNKNOWN.
    pub const fn rank(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    /// The worse of two severities.
    pub fn precedence(self, other: Severity) -> Severity {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Worst severity of a sequence, `None` when the sequence is empty.
    pub fn worst<I>(severities: I) -> Option<Severity>
    where
        I: IntoIterator<Item = Severity>,
    {
        severities.into_iter().reduce(Severity::precedence)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Plugin exit code (OK=0, WARNING=1, CRITICAL=2, UNKNOWN=3).
    pub const fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the state name (case-insensitive) or its exit code.
impl FromStr for Severity {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" | "0" => Ok(Severity::Ok),
            "WARNING" | "1" => Ok(Severity::Warning),
            "CRITICAL" | "2" => Ok(Severity::Critical),
            "UNKNOWN" | "3" => Ok(Severity::Unknown),
            _ => Err(ProbeError::InvalidState(s.to_string())),
        }
    }
}

/// One classified item: an alert instance, a query sample or an endpoint probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub severity: Severity,
    pub text: String,
    pub perfdata: Option<Perfdata>,
}

impl Verdict {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            perfdata: None,
        }
    }

    pub fn with_perfdata(mut self, perfdata: Perfdata) -> Self {
        self.perfdata = Some(perfdata);
        self
    }
}
