//! Verdict aggregation and the three-part plugin output.
//!
//! ```text
//! CRITICAL - 2 Alerts: 1 Firing - 0 Pending - 1 Inactive
//!  \_[OK] [TargetMissing] is inactive
//!  \_[CRITICAL] [JobMissing] - Job: [alertmanager] is firing - value: 1.00
//!  | total=2 firing=1 pending=0 inactive=1
//! ```

use std::fmt;

use crate::core::types::{Severity, Verdict};
use crate::format::perfdata::{self, Perfdata};

/// How the summary line of a report is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStyle {
    /// `<n> <noun>: <c> <critical> - <w> <warning> - <o> <ok>`, or `<n> <noun> OK`
    Counted {
        noun: &'static str,
        critical: &'static str,
        warning: &'static str,
        ok: &'static str,
    },
    /// The text of the single item becomes the summary
    Single,
}

/// Per call site wording. Only the text differs between alerts, queries and health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTemplate {
    pub style: SummaryStyle,
    pub empty_text: &'static str,
    /// Prefix the perfdata with `total`/per-state counters
    pub counters: bool,
}

impl ReportTemplate {
    pub const fn alerts(empty_text: &'static str) -> Self {
        Self {
            style: SummaryStyle::Counted {
                noun: "Alerts",
                critical: "Firing",
                warning: "Pending",
                ok: "Inactive",
            },
            empty_text,
            counters: true,
        }
    }

    pub const fn metrics(empty_text: &'static str) -> Self {
        Self {
            style: SummaryStyle::Counted {
                noun: "Metrics",
                critical: "Critical",
                warning: "Warning",
                ok: "Ok",
            },
            empty_text,
            counters: false,
        }
    }

    pub const fn single(empty_text: &'static str) -> Self {
        Self {
            style: SummaryStyle::Single,
            empty_text,
            counters: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine {
    pub severity: Severity,
    pub text: String,
}

/// Final outcome of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub severity: Severity,
    pub summary: String,
    pub lines: Vec<ItemLine>,
    pub details: Vec<String>,
    pub perfdata: Vec<Perfdata>,
    pub notes: Vec<String>,
}

impl Report {
    /// A report for a failure that happened before or instead of classification.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Unknown,
            summary: message.into(),
            lines: Vec::new(),
            details: Vec::new(),
            perfdata: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.severity, self.summary)?;
        let mut multiline = false;
        for line in &self.lines {
            write!(f, "\n \\_[{}] {}", line.severity, line.text)?;
            multiline = true;
        }
        for detail in &self.details {
            write!(f, "\n{detail}")?;
            multiline = true;
        }
        if !self.perfdata.is_empty() {
            let sep = if multiline { "\n | " } else { " | " };
            write!(f, "{sep}{}", perfdata::join(&self.perfdata))?;
        }
        for note in &self.notes {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}

/// Collects verdicts in insertion order and reduces them to a [`Report`].
#[derive(Debug)]
pub struct Aggregator {
    template: ReportTemplate,
    default_severity: Severity,
    show_all: bool,
    verdicts: Vec<Verdict>,
    details: Vec<String>,
    notes: Vec<String>,
}

impl Aggregator {
    /// `default_severity` is the overall state when no verdict is added.
    pub fn new(template: ReportTemplate, default_severity: Severity) -> Self {
        Self {
            template,
            default_severity,
            show_all: false,
            verdicts: Vec::new(),
            details: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Emit item lines even when everything is OK.
    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn add_verdict(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    pub fn add_detail(&mut self, detail: impl Into<String>) {
        self.details.push(detail.into());
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn overall(&self) -> Severity {
        Severity::worst(self.verdicts.iter().map(|v| v.severity)).unwrap_or(self.default_severity)
    }

    pub fn finalize(self) -> Report {
        let severity = self.overall();
        let counts = Counts::of(&self.verdicts);

        let summary = match self.template.style {
            SummaryStyle::Counted {
                noun,
                critical,
                warning,
                ok,
            } => {
                if severity == Severity::Ok {
                    format!("{} {noun} OK", counts.total)
                } else {
                    format!(
                        "{} {noun}: {} {critical} - {} {warning} - {} {ok}",
                        counts.total, counts.critical, counts.warning, counts.ok
                    )
                }
            }
            SummaryStyle::Single => match self.verdicts.first() {
                Some(v) => v.text.clone(),
                None => self.template.empty_text.to_string(),
            },
        };

        let lines = if self.verdicts.is_empty() {
            match self.template.style {
                SummaryStyle::Counted { .. } => vec![ItemLine {
                    severity,
                    text: self.template.empty_text.to_string(),
                }],
                SummaryStyle::Single => Vec::new(),
            }
        } else if self.template.style == SummaryStyle::Single
            || (severity == Severity::Ok && !self.show_all)
        {
            Vec::new()
        } else {
            self.verdicts
                .iter()
                .map(|v| ItemLine {
                    severity: v.severity,
                    text: v.text.clone(),
                })
                .collect()
        };

        let mut perfdata = Vec::new();
        if self.template.counters {
            if let SummaryStyle::Counted {
                critical,
                warning,
                ok,
                ..
            } = self.template.style
            {
                perfdata.push(Perfdata::new("total", counts.total as f64));
                perfdata.push(Perfdata::new(critical.to_lowercase(), counts.critical as f64));
                perfdata.push(Perfdata::new(warning.to_lowercase(), counts.warning as f64));
                perfdata.push(Perfdata::new(ok.to_lowercase(), counts.ok as f64));
            }
        }
        perfdata.extend(self.verdicts.into_iter().filter_map(|v| v.perfdata));

        Report {
            severity,
            summary,
            lines,
            details: self.details,
            perfdata,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    total: usize,
    critical: usize,
    warning: usize,
    ok: usize,
}

impl Counts {
    /// `total` is the sum of the three classified states. UNKNOWN items
    /// still show up as sub-lines but are not counted.
    fn of(verdicts: &[Verdict]) -> Self {
        let mut counts = verdicts.iter().fold(Counts::default(), |mut counts, v| {
            match v.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Ok => counts.ok += 1,
                Severity::Unknown => {}
            }
            counts
        });
        counts.total = counts.critical + counts.warning + counts.ok;
        counts
    }
}
