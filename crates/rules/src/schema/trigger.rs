//! Trigger entries and severities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One threshold + severity pair inside a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TriggerConfig {
    /// Threshold expression, e.g. `"75%"`, `"$50 remaining"`, `"10% over"`.
    pub at: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Alert severity, mapped to push priority by the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Warning,
    Urgent,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Urgent => write!(f, "urgent"),
        }
    }
}
