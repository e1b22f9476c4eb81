//! Threshold expression parser.
//!
//! Recognized grammars (surrounding whitespace is ignored):
//! - `"<number>%"` → [`Threshold::PercentOfGoal`], valid for `goal_threshold`
//! - `"[$]<number> remaining"` → [`Threshold::AbsoluteRemaining`], valid for `goal_threshold`
//! - `"<number>% over"` → [`Threshold::PercentOverProjection`], valid for `pacing`
//!
//! Numbers are non-negative integers or decimals with at most three
//! fractional digits. The words `remaining` and `over` are case-insensitive.

use std::fmt;

use serde::{Deserialize, Serialize};
use tripwire_core::Milliunits;

use crate::error::{Result, RuleError};
use crate::schema::RuleType;

const REMAINING: &str = "remaining";
const OVER: &str = "over";

/// The kind of comparison a threshold expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    PercentOfGoal,
    AbsoluteRemaining,
    PercentOverProjection,
}

impl ThresholdKind {
    /// Whether rules of `rule_type` may use thresholds of this kind.
    pub fn is_valid_for(self, rule_type: RuleType) -> bool {
        match rule_type {
            RuleType::GoalThreshold => matches!(
                self,
                ThresholdKind::PercentOfGoal | ThresholdKind::AbsoluteRemaining
            ),
            RuleType::Pacing => self == ThresholdKind::PercentOverProjection,
        }
    }
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdKind::PercentOfGoal => write!(f, "percent_of_goal"),
            ThresholdKind::AbsoluteRemaining => write!(f, "absolute_remaining"),
            ThresholdKind::PercentOverProjection => write!(f, "percent_over_projection"),
        }
    }
}

/// A percentage held exactly, in thousandths of a percent (`"1.1%"` → `1100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(i64);

impl Percent {
    const MILLI_PER_RATIO: i64 = 100_000;

    pub const fn from_milli(milli_percent: i64) -> Self {
        Self(milli_percent)
    }

    pub const fn whole(percent: i64) -> Self {
        Self(percent * 1000)
    }

    pub fn as_milli(self) -> i64 {
        self.0
    }

    /// The percentage as a ratio (`75%` → `0.75`).
    pub fn ratio(self) -> f64 {
        self.0 as f64 / Self::MILLI_PER_RATIO as f64
    }

    /// Whether `part / whole >= self`, compared without rounding.
    /// `whole` must be positive.
    pub fn is_reached_by(self, part: Milliunits, whole: Milliunits) -> bool {
        i128::from(part.as_milliunits()) * i128::from(Self::MILLI_PER_RATIO)
            >= i128::from(whole.as_milliunits()) * i128::from(self.0)
    }
}

/// A parsed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    /// Fires when `spent / limit >= percent`.
    PercentOfGoal(Percent),
    /// Fires when `limit - spent <= amount`.
    AbsoluteRemaining(Milliunits),
    /// Fires when `(projected - limit) / limit >= percent`.
    PercentOverProjection(Percent),
}

impl Threshold {
    pub fn kind(&self) -> ThresholdKind {
        match self {
            Threshold::PercentOfGoal(_) => ThresholdKind::PercentOfGoal,
            Threshold::AbsoluteRemaining(_) => ThresholdKind::AbsoluteRemaining,
            Threshold::PercentOverProjection(_) => ThresholdKind::PercentOverProjection,
        }
    }

    /// The numeric threshold: a ratio for percentage kinds, currency units
    /// for `AbsoluteRemaining`.
    pub fn value(&self) -> f64 {
        match self {
            Threshold::PercentOfGoal(percent) | Threshold::PercentOverProjection(percent) => {
                percent.ratio()
            }
            Threshold::AbsoluteRemaining(amount) => amount.as_units(),
        }
    }
}

/// Parse a threshold expression for a rule of type `rule_type`.
///
/// Fails with `InvalidThresholdExpression` when no grammar matches and with
/// `IncompatibleThresholdKind` when the kind is not accepted by the rule type.
pub fn parse(expression: &str, rule_type: RuleType) -> Result<Threshold> {
    let threshold = parse_expression(expression)?;
    let kind = threshold.kind();
    if !kind.is_valid_for(rule_type) {
        return Err(RuleError::IncompatibleThresholdKind {
            expression: expression.to_string(),
            kind,
            rule_type,
        });
    }
    Ok(threshold)
}

/// Parse a threshold expression without checking rule-type compatibility.
pub fn parse_expression(expression: &str) -> Result<Threshold> {
    let invalid = || RuleError::InvalidThresholdExpression {
        expression: expression.to_string(),
    };

    let at = expression.trim();

    if let Some(amount) = strip_suffix_ignore_case(at, REMAINING) {
        let amount = amount.trim_end();
        let amount = amount.strip_prefix('$').unwrap_or(amount).trim_start();
        let amount = Milliunits::parse_units(amount).map_err(|_| invalid())?;
        return Ok(Threshold::AbsoluteRemaining(amount));
    }

    if let Some(percent) = strip_suffix_ignore_case(at, OVER) {
        let number = percent
            .trim_end()
            .strip_suffix('%')
            .ok_or_else(invalid)?;
        let percent = parse_percent(number).ok_or_else(invalid)?;
        return Ok(Threshold::PercentOverProjection(percent));
    }

    if let Some(number) = at.strip_suffix('%') {
        let percent = parse_percent(number).ok_or_else(invalid)?;
        return Ok(Threshold::PercentOfGoal(percent));
    }

    Err(invalid())
}

/// Strip an ASCII `suffix` case-insensitively, returning the remainder.
fn strip_suffix_ignore_case<'a>(input: &'a str, suffix: &str) -> Option<&'a str> {
    let split = input.len().checked_sub(suffix.len())?;
    if !input.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = input.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Parse `"<digits>[.<digits>]"` (whitespace allowed around it) as a percentage.
/// Same grammar as currency amounts, so the thousandths land in one integer.
fn parse_percent(number: &str) -> Option<Percent> {
    let milli = Milliunits::parse_units(number.trim()).ok()?;
    Some(Percent::from_milli(milli.as_milliunits()))
}
