//! Fired triggers and their rendering into notification payloads.

use serde::Serialize;
use tripwire_core::{Category, Milliunits, NotificationPayload, Priority};

use crate::compile::CompiledTrigger;
use crate::schema::{RuleType, Severity};
use crate::state::TriggerKey;
use crate::threshold::Threshold;

const WARNING_ICON: &str = "⚠️";
const URGENT_ICON: &str = "🔴";

/// The measurement that made a trigger fire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// `spent / limit` for percent-of-goal triggers.
    SpentRatio {
        spent: Milliunits,
        limit: Milliunits,
        ratio: f64,
    },
    /// `limit - spent` for remaining-amount triggers; negative when overspent.
    Remaining {
        spent: Milliunits,
        limit: Milliunits,
        remaining: Milliunits,
    },
    /// Linear month-end projection for pacing triggers.
    Projection {
        spent: Milliunits,
        limit: Milliunits,
        projected: Milliunits,
        over_ratio: f64,
    },
}

impl Observation {
    pub fn spent(&self) -> Milliunits {
        match self {
            Observation::SpentRatio { spent, .. }
            | Observation::Remaining { spent, .. }
            | Observation::Projection { spent, .. } => *spent,
        }
    }

    pub fn limit(&self) -> Milliunits {
        match self {
            Observation::SpentRatio { limit, .. }
            | Observation::Remaining { limit, .. }
            | Observation::Projection { limit, .. } => *limit,
        }
    }
}

/// A trigger whose threshold was crossed in this run.
///
/// Produced by the evaluator, consumed by the formatter and dispatcher, and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredTrigger {
    pub category_name: String,
    pub rule_type: RuleType,
    pub severity: Severity,
    /// The trigger expression as configured (trimmed).
    pub at: String,
    pub threshold: Threshold,
    pub observation: Observation,
    /// One-line human summary.
    pub message: String,
}

impl FiredTrigger {
    pub fn new(
        category: &Category,
        rule_type: RuleType,
        trigger: &CompiledTrigger,
        observation: Observation,
    ) -> Self {
        let message = summarize(&observation, &trigger.at);
        Self {
            category_name: category.name.clone(),
            rule_type,
            severity: trigger.severity,
            at: trigger.at.clone(),
            threshold: trigger.threshold,
            observation,
            message,
        }
    }

    /// Cooldown identity of this trigger.
    pub fn key(&self) -> TriggerKey {
        TriggerKey::new(self.category_name.clone(), self.rule_type, self.at.clone())
    }

    /// The observed value compared against the threshold: a ratio for
    /// percentage thresholds, currency units for remaining amounts.
    pub fn value(&self) -> f64 {
        match &self.observation {
            Observation::SpentRatio { ratio, .. } => *ratio,
            Observation::Remaining { remaining, .. } => remaining.as_units(),
            Observation::Projection { over_ratio, .. } => *over_ratio,
        }
    }
}

/// Render a fired trigger as a push notification.
///
/// Warnings go out at low priority with ⚠️, urgent alerts at high priority
/// with 🔴.
pub fn format_alert(fired: &FiredTrigger) -> NotificationPayload {
    let (priority, icon) = match fired.severity {
        Severity::Warning => (Priority::Low, WARNING_ICON),
        Severity::Urgent => (Priority::High, URGENT_ICON),
    };

    let spent = fired.observation.spent();
    let limit = fired.observation.limit();
    let mut lines = vec![format!(
        "{}: spent {spent} of {limit} ({})",
        fired.category_name,
        format_percent(percent_of(spent, limit)),
    )];
    match &fired.observation {
        Observation::SpentRatio { .. } | Observation::Remaining { .. } => {
            lines.push(format!("Remaining: {}", limit - spent));
        }
        Observation::Projection {
            projected,
            over_ratio,
            ..
        } => {
            lines.push(format!(
                "Projected: {projected} ({} over)",
                format_percent(over_ratio * 100.0)
            ));
        }
    }
    lines.push(format!("Trigger: {} [{}]", fired.at, fired.severity));

    NotificationPayload {
        title: format!("{icon} Tripwire: {}", fired.category_name),
        body: lines.join("\n"),
        priority,
        icon: icon.to_string(),
    }
}

fn summarize(observation: &Observation, at: &str) -> String {
    match observation {
        Observation::SpentRatio { limit, .. } => format!(
            "{} of {limit} spent (trigger {at})",
            format_percent(percent_of(observation.spent(), *limit))
        ),
        Observation::Remaining {
            limit, remaining, ..
        } => format!("{remaining} remaining of {limit} (trigger {at})"),
        Observation::Projection {
            limit,
            projected,
            over_ratio,
            ..
        } => format!(
            "on pace for {projected}, {} over {limit} (trigger {at})",
            format_percent(over_ratio * 100.0)
        ),
    }
}

fn percent_of(spent: Milliunits, limit: Milliunits) -> f64 {
    if limit.is_zero() {
        return 0.0;
    }
    spent.as_milliunits() as f64 * 100.0 / limit.as_milliunits() as f64
}

fn format_percent(percent: f64) -> String {
    format!("{percent:.0}%")
}
