//! Rule evaluation against a single category.
//!
//! Each rule type has its own evaluation function:
//! - `goal_threshold` compares month-to-date spend against the limit, either
//!   as a ratio (`"75%"`) or as the amount left (`"$50 remaining"`).
//! - `pacing` extrapolates month-end spend linearly from the elapsed share
//!   of the month and compares the overshoot ratio (`"10% over"`).
//!
//! Evaluation yields candidates only; cooldown is applied by the caller.

use tracing::debug;
use tripwire_core::{Category, Milliunits};

use crate::alert::{FiredTrigger, Observation};
use crate::compile::{CompiledRule, CompiledTrigger};
use crate::error::{Result, RuleError};
use crate::month::MonthProgress;
use crate::schema::{RuleType, SpendingLimit};
use crate::threshold::Threshold;

/// Evaluate one rule for one category, returning every crossed trigger.
///
/// Returns `MissingGoalData` when the category has no usable limit; callers
/// treat that as a skip for this (category, rule) pair.
pub fn evaluate(
    category: &Category,
    spending_limit: SpendingLimit,
    rule: &CompiledRule,
    progress: &MonthProgress,
) -> Result<Vec<FiredTrigger>> {
    match rule.rule_type {
        RuleType::GoalThreshold => evaluate_goal_threshold(category, spending_limit, rule),
        RuleType::Pacing => evaluate_pacing(category, spending_limit, rule, progress),
    }
}

fn require_limit(category: &Category, spending_limit: SpendingLimit) -> Result<Milliunits> {
    spending_limit
        .resolve(category)
        .ok_or_else(|| RuleError::MissingGoalData {
            category: category.name.clone(),
        })
}

fn evaluate_goal_threshold(
    category: &Category,
    spending_limit: SpendingLimit,
    rule: &CompiledRule,
) -> Result<Vec<FiredTrigger>> {
    let limit = require_limit(category, spending_limit)?;
    let spent = category.spent_this_month;

    let fired = rule
        .triggers
        .iter()
        .filter_map(|trigger| {
            let observation = match trigger.threshold {
                Threshold::PercentOfGoal(percent) => {
                    let ratio = spent.ratio_of(limit)?;
                    percent.is_reached_by(spent, limit).then_some(Observation::SpentRatio {
                        spent,
                        limit,
                        ratio,
                    })?
                }
                Threshold::AbsoluteRemaining(amount) => {
                    let remaining = limit - spent;
                    (remaining <= amount).then_some(Observation::Remaining {
                        spent,
                        limit,
                        remaining,
                    })?
                }
                // Rejected for goal_threshold rules at compile time.
                Threshold::PercentOverProjection(_) => return None,
            };
            Some(FiredTrigger::new(category, rule.rule_type, trigger, observation))
        })
        .collect();

    Ok(fired)
}

fn evaluate_pacing(
    category: &Category,
    spending_limit: SpendingLimit,
    rule: &CompiledRule,
    progress: &MonthProgress,
) -> Result<Vec<FiredTrigger>> {
    if progress.hours_elapsed < rule.warm_up_hours {
        debug!(
            category = %category.name,
            hours_elapsed = progress.hours_elapsed,
            warm_up_hours = rule.warm_up_hours,
            "pacing suppressed during warm-up"
        );
        return Ok(Vec::new());
    }
    let Some(factor) = progress.extrapolation_factor() else {
        debug!(category = %category.name, "pacing suppressed at start of month");
        return Ok(Vec::new());
    };

    let limit = require_limit(category, spending_limit)?;
    let spent = category.spent_this_month;
    let projected_milli = spent.as_milliunits() as f64 * factor;
    let limit_milli = limit.as_milliunits() as f64;
    let over_ratio = (projected_milli - limit_milli) / limit_milli;
    let projected = Milliunits::new(projected_milli.round() as i64);

    let fired = rule
        .triggers
        .iter()
        .filter(|trigger| match trigger.threshold {
            Threshold::PercentOverProjection(percent) => over_ratio >= percent.ratio(),
            // Rejected for pacing rules at compile time.
            Threshold::PercentOfGoal(_) | Threshold::AbsoluteRemaining(_) => false,
        })
        .map(|trigger: &CompiledTrigger| {
            FiredTrigger::new(
                category,
                rule.rule_type,
                trigger,
                Observation::Projection {
                    spent,
                    limit,
                    projected,
                    over_ratio,
                },
            )
        })
        .collect();

    Ok(fired)
}
