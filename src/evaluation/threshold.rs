//! Monitoring-plugin range thresholds (`10`, `10:`, `:10`, `~:10`, `@10:20`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::core::errors::ThresholdError;

static BOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("bound pattern is valid")
});

/// A parsed range. A value *violates* the threshold when it falls outside
/// `[lower, upper]`, or inside it when `inside` is set (`@` prefix).
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub inside: bool,
}

impl Threshold {
    /// Parse the plugin range syntax.
    ///
    /// * `N`     violation if value > N
    /// * `:N`    violation if value is outside `[0, N]`
    /// * `N:`    violation if value < N
    /// * `~:N`   violation if value > N (explicit negative infinity)
    /// * `N:M`   violation if value is outside `[N, M]`
    /// * `@...`  any of the above, inverted
    pub fn parse(spec: &str) -> Result<Self, ThresholdError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(ThresholdError::new(spec, "threshold is empty"));
        }

        let (inside, body) = match trimmed.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (lower, upper) = match body.split_once(':') {
            None => (None, Some(parse_bound(spec, body)?)),
            Some((start, end)) => {
                if end.contains(':') {
                    return Err(ThresholdError::new(spec, "unexpected trailing ':'"));
                }
                if start.is_empty() && end.is_empty() {
                    return Err(ThresholdError::new(spec, "range has no bounds"));
                }
                let lower = match start {
                    "" => Some(0.0),
                    "~" => None,
                    s => Some(parse_bound(spec, s)?),
                };
                let upper = match end {
                    "" => None,
                    e => Some(parse_bound(spec, e)?),
                };
                (lower, upper)
            }
        };

        if let (Some(l), Some(u)) = (lower, upper) {
            if l > u {
                return Err(ThresholdError::new(spec, "start is greater than end"));
            }
        }

        Ok(Self {
            lower,
            upper,
            inside,
        })
    }

    /// Whether `value` breaches the threshold. NaN and infinities never do.
    pub fn violates(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let below = self.lower.map_or(false, |l| value < l);
        let above = self.upper.map_or(false, |u| value > u);
        let outside = below || above;
        if self.inside {
            !outside
        } else {
            outside
        }
    }
}

fn parse_bound(spec: &str, raw: &str) -> Result<f64, ThresholdError> {
    if !BOUND.is_match(raw) {
        return Err(ThresholdError::new(
            spec,
            format!("'{raw}' is not a number"),
        ));
    }
    raw.parse::<f64>()
        .map_err(|e| ThresholdError::new(spec, format!("'{raw}': {e}")))
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical text form, used when thresholds are embedded in perfdata.
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inside {
            f.write_str("@")?;
        }
        match (self.lower, self.upper) {
            (None, Some(u)) => write!(f, "{u}"),
            (Some(l), None) => write!(f, "{l}:"),
            (Some(l), Some(u)) => write!(f, "{l}:{u}"),
            (None, None) => f.write_str("~:"),
        }
    }
}
