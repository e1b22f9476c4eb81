//! Startup validation: turns the raw [`AlertsConfig`] into compiled rules.
//!
//! Every threshold expression is parsed exactly once here. Any problem is
//! fatal for the run and names the category (or `auto_alerts`) it came from,
//! since a bad config must not silently under-alert.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::error::{Result, RuleError};
use crate::schema::{
    AlertsConfig, AutoAlertsConfig, CategoryConfig, RuleConfig, RuleType, Severity, SpendingLimit,
};
use crate::threshold::{self, Threshold};

/// Scope label used in errors for the auto-alerts section.
pub const AUTO_ALERTS_SCOPE: &str = "auto_alerts";

/// A validated trigger with its parsed threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTrigger {
    /// The original expression; part of the trigger's cooldown key.
    pub at: String,
    pub severity: Severity,
    pub threshold: Threshold,
}

/// A validated rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub rule_type: RuleType,
    pub min_hours_between_alerts: f64,
    /// Always 0 for `goal_threshold` rules.
    pub warm_up_hours: f64,
    pub triggers: Vec<CompiledTrigger>,
}

/// Explicit per-category configuration after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCategory {
    pub enabled: bool,
    pub spending_limit: SpendingLimit,
    pub rules: Vec<CompiledRule>,
}

/// Auto-alerts section after validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledAutoAlerts {
    pub enabled: bool,
    pub exclude: BTreeSet<String>,
    pub spending_limit: SpendingLimit,
    pub rules: Vec<CompiledRule>,
}

/// The whole rules file after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledConfig {
    pub budget_id: String,
    pub auto_alerts: CompiledAutoAlerts,
    pub categories: IndexMap<String, CompiledCategory>,
}

impl CompiledConfig {
    /// Total number of triggers across explicit and auto rules.
    pub fn trigger_count(&self) -> usize {
        let count = |rules: &[CompiledRule]| -> usize { rules.iter().map(|r| r.triggers.len()).sum() };
        count(&self.auto_alerts.rules)
            + self
                .categories
                .values()
                .map(|c| count(&c.rules))
                .sum::<usize>()
    }
}

/// Validate and compile a raw config.
pub fn compile(config: &AlertsConfig) -> Result<CompiledConfig> {
    if config.budget_id.trim().is_empty() {
        return Err(RuleError::Configuration("budget_id must not be empty".to_string()));
    }

    let auto_alerts =
        compile_auto_alerts(&config.auto_alerts).map_err(|e| e.in_scope(AUTO_ALERTS_SCOPE))?;

    let mut categories = IndexMap::with_capacity(config.categories.len());
    for (name, category) in &config.categories {
        if name.trim().is_empty() {
            return Err(RuleError::Configuration(
                "category names must not be empty".to_string(),
            ));
        }
        let compiled = compile_category(category)
            .map_err(|e| e.in_scope(format!("category '{name}'")))?;
        categories.insert(name.clone(), compiled);
    }

    Ok(CompiledConfig {
        budget_id: config.budget_id.clone(),
        auto_alerts,
        categories,
    })
}

fn compile_auto_alerts(auto: &AutoAlertsConfig) -> Result<CompiledAutoAlerts> {
    let rules = compile_rules(&auto.rules)?;
    if auto.enabled && rules.is_empty() {
        return Err(RuleError::Configuration(
            "auto_alerts is enabled but defines no rules".to_string(),
        ));
    }
    Ok(CompiledAutoAlerts {
        enabled: auto.enabled,
        exclude: auto.exclude.iter().cloned().collect(),
        spending_limit: auto.spending_limit,
        rules,
    })
}

fn compile_category(category: &CategoryConfig) -> Result<CompiledCategory> {
    Ok(CompiledCategory {
        enabled: category.enabled,
        spending_limit: category.spending_limit,
        rules: compile_rules(&category.rules)?,
    })
}

/// Compile a rule list, rejecting triggers that would share a cooldown key or
/// spell the same threshold two ways (`"75%"` and `"75 %"`).
fn compile_rules(rules: &[RuleConfig]) -> Result<Vec<CompiledRule>> {
    let mut seen: HashSet<(RuleType, Threshold)> = HashSet::new();
    let mut compiled = Vec::with_capacity(rules.len());

    for rule in rules {
        let rule_compiled = compile_rule(rule)?;
        for trigger in &rule_compiled.triggers {
            if !seen.insert((rule_compiled.rule_type, trigger.threshold)) {
                return Err(RuleError::Configuration(format!(
                    "duplicate {} trigger '{}'",
                    rule_compiled.rule_type, trigger.at
                )));
            }
        }
        compiled.push(rule_compiled);
    }

    Ok(compiled)
}

/// Validate a single rule and parse its thresholds.
pub fn compile_rule(rule: &RuleConfig) -> Result<CompiledRule> {
    let min_hours = rule.min_hours_between_alerts;
    if !min_hours.is_finite() || min_hours <= 0.0 {
        return Err(RuleError::Configuration(format!(
            "{} rule: min_hours_between_alerts must be positive, got {min_hours}",
            rule.rule_type
        )));
    }

    let warm_up_hours = match (rule.rule_type, rule.warm_up_hours) {
        (RuleType::Pacing, Some(hours)) if !hours.is_finite() || hours < 0.0 => {
            return Err(RuleError::Configuration(format!(
                "pacing rule: warm_up_hours must be >= 0, got {hours}"
            )));
        }
        (RuleType::Pacing, hours) => hours.unwrap_or(0.0),
        (RuleType::GoalThreshold, Some(_)) => {
            return Err(RuleError::Configuration(
                "warm_up_hours only applies to pacing rules".to_string(),
            ));
        }
        (RuleType::GoalThreshold, None) => 0.0,
    };

    if rule.triggers.is_empty() {
        return Err(RuleError::Configuration(format!(
            "{} rule has no triggers",
            rule.rule_type
        )));
    }

    let triggers = rule
        .triggers
        .iter()
        .map(|t| {
            Ok(CompiledTrigger {
                at: t.at.trim().to_string(),
                severity: t.severity,
                threshold: threshold::parse(&t.at, rule.rule_type)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CompiledRule {
        rule_type: rule.rule_type,
        min_hours_between_alerts: min_hours,
        warm_up_hours,
        triggers,
    })
}
