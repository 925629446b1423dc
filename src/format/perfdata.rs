//! Performance data tokens (`label=value;warn;crit`) as consumed by graphing front-ends.

use std::fmt;

use crate::evaluation::threshold::Threshold;

#[derive(Debug, Clone, PartialEq)]
pub struct Perfdata {
    pub label: String,
    pub value: f64,
    pub warning: Option<Threshold>,
    pub critical: Option<Threshold>,
}

impl Perfdata {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            warning: None,
            critical: None,
        }
    }

    pub fn with_thresholds(mut self, warning: Threshold, critical: Threshold) -> Self {
        self.warning = Some(warning);
        self.critical = Some(critical);
        self
    }
}

impl fmt::Display for Perfdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label, self.value)?;
        match (&self.warning, &self.critical) {
            (None, None) => Ok(()),
            (Some(warn), None) => write!(f, ";{warn}"),
            (warn, Some(crit)) => {
                f.write_str(";")?;
                if let Some(warn) = warn {
                    write!(f, "{warn}")?;
                }
                write!(f, ";{crit}")
            }
        }
    }
}

/// Replace every character the perfdata grammar reserves (quotes, `=`, `;`,
/// `|`, braces, commas, whitespace, ...) with `_`.
pub fn sanitize_label(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Space-separated token list, the part after `|` in plugin output.
pub fn join(entries: &[Perfdata]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
