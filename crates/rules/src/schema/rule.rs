//! Rule definitions and the closed set of rule types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::trigger::TriggerConfig;

/// Supported rule types. Each type has its own evaluation function and its
/// own set of accepted threshold kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    GoalThreshold,
    Pacing,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::GoalThreshold => "goal_threshold",
            RuleType::Pacing => "pacing",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "goal_threshold" => Ok(RuleType::GoalThreshold),
            "pacing" => Ok(RuleType::Pacing),
            other => Err(format!("unknown rule type: '{}'", other)),
        }
    }
}

/// A single rule within a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Minimum hours between two firings of the same trigger.
    pub min_hours_between_alerts: f64,
    /// Hours into the month before pacing projections are trusted.
    /// Only meaningful for `pacing` rules.
    #[serde(default)]
    pub warm_up_hours: Option<f64>,
    pub triggers: Vec<TriggerConfig>,
}
