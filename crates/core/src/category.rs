use serde::{Deserialize, Serialize};

use crate::money::Milliunits;

/// One budget category as seen in the current month's snapshot.
///
/// Identity is the exact, case-sensitive `name`. The rule engine only
/// reads categories; a fresh snapshot is fetched every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Target amount of the category's goal, if one is set.
    #[serde(default)]
    pub goal_target: Option<Milliunits>,
    /// Outflows so far this month, as a non-negative amount.
    pub spent_this_month: Milliunits,
    /// Amount assigned to the category this month.
    #[serde(default)]
    pub budgeted: Milliunits,
    #[serde(default)]
    pub has_goal: bool,
}

impl Category {
    /// Build a category with a goal. `has_goal` follows from a positive target.
    pub fn with_goal(name: impl Into<String>, goal_target: Milliunits, spent: Milliunits) -> Self {
        Self {
            name: name.into(),
            goal_target: Some(goal_target),
            spent_this_month: spent,
            budgeted: Milliunits::ZERO,
            has_goal: goal_target.is_positive(),
        }
    }

    /// Build a category without a goal.
    pub fn without_goal(name: impl Into<String>, budgeted: Milliunits, spent: Milliunits) -> Self {
        Self {
            name: name.into(),
            goal_target: None,
            spent_this_month: spent,
            budgeted,
            has_goal: false,
        }
    }
}
