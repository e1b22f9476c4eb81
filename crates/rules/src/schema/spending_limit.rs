//! Which amount a category's rules measure spending against.

use serde::{Deserialize, Serialize};
use std::fmt;

use tripwire_core::{Category, Milliunits};

/// Source of the "goal" denominator used by every rule of a category.
///
/// In YAML this is `goal`, `budgeted` (alias `auto`), or a plain number of
/// currency units such as `500` or `412.50`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpendingLimit", into = "RawSpendingLimit")]
pub enum SpendingLimit {
    /// The category's goal target.
    #[default]
    Goal,
    /// The amount assigned to the category this month.
    Budgeted,
    /// A fixed amount from configuration.
    Amount(Milliunits),
}

impl SpendingLimit {
    /// Resolve the limit for a category. Absent or zero limits yield `None`.
    pub fn resolve(&self, category: &Category) -> Option<Milliunits> {
        let limit = match self {
            SpendingLimit::Goal => category.goal_target?,
            SpendingLimit::Budgeted => category.budgeted,
            SpendingLimit::Amount(amount) => *amount,
        };
        limit.is_positive().then_some(limit)
    }
}

impl fmt::Display for SpendingLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpendingLimit::Goal => write!(f, "goal"),
            SpendingLimit::Budgeted => write!(f, "budgeted"),
            SpendingLimit::Amount(amount) => write!(f, "{amount}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSpendingLimit {
    Amount(f64),
    Keyword(String),
}

impl TryFrom<RawSpendingLimit> for SpendingLimit {
    type Error = String;

    fn try_from(raw: RawSpendingLimit) -> Result<Self, Self::Error> {
        match raw {
            RawSpendingLimit::Amount(units) if units.is_finite() && units >= 0.0 => {
                Ok(SpendingLimit::Amount(Milliunits::from_f64_units(units)))
            }
            RawSpendingLimit::Amount(units) => {
                Err(format!("spending_limit must be a non-negative amount, got {units}"))
            }
            RawSpendingLimit::Keyword(word) => match word.trim().to_ascii_lowercase().as_str() {
                "goal" => Ok(SpendingLimit::Goal),
                "budgeted" | "auto" => Ok(SpendingLimit::Budgeted),
                other => Err(format!(
                    "unknown spending_limit '{other}' (expected goal, budgeted, auto or an amount)"
                )),
            },
        }
    }
}

impl From<SpendingLimit> for RawSpendingLimit {
    fn from(limit: SpendingLimit) -> Self {
        match limit {
            SpendingLimit::Goal => RawSpendingLimit::Keyword("goal".to_string()),
            SpendingLimit::Budgeted => RawSpendingLimit::Keyword("budgeted".to_string()),
            SpendingLimit::Amount(amount) => RawSpendingLimit::Amount(amount.as_units()),
        }
    }
}
