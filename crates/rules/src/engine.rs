//! One evaluation pass: resolve, evaluate, gate, format.
//!
//! The engine is synchronous and performs no I/O. Callers fetch the snapshot
//! and state, deliver the planned payloads, then reconcile with the keys that
//! were actually delivered.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use tripwire_core::{Category, NotificationPayload};

use crate::alert::{format_alert, FiredTrigger};
use crate::compile::CompiledConfig;
use crate::cooldown::should_fire;
use crate::error::RuleError;
use crate::evaluator::evaluate;
use crate::month::MonthProgress;
use crate::resolver::resolve;
use crate::schema::RuleType;
use crate::state::{reconcile, AlertState, TriggerKey};

/// A candidate that passed the cooldown gate and should be delivered.
#[derive(Debug, Clone)]
pub struct PendingAlert {
    pub key: TriggerKey,
    pub fired: FiredTrigger,
    pub payload: NotificationPayload,
}

/// A (category, rule) pair that could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Skip {
    pub category: String,
    pub rule_type: RuleType,
    pub reason: String,
}

/// Outcome of planning one run.
#[derive(Debug, Clone, Default)]
pub struct AlertPlan {
    pub pending: Vec<PendingAlert>,
    /// Candidates held back by their cooldown.
    pub suppressed: Vec<TriggerKey>,
    pub skipped: Vec<Skip>,
}

impl AlertPlan {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Next state after delivery. Only `delivered` keys are recorded, so an
    /// alert whose delivery failed is retried on the next run.
    pub fn reconcile<'a>(
        &self,
        prior: &AlertState,
        delivered: impl IntoIterator<Item = &'a TriggerKey>,
        now: DateTime<Utc>,
    ) -> AlertState {
        reconcile(prior, delivered, now)
    }
}

/// Compiled rules plus the evaluation pipeline.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    config: CompiledConfig,
}

impl AlertEngine {
    pub fn new(config: CompiledConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompiledConfig {
        &self.config
    }

    /// Evaluate every resolved category against `state` at time `now`.
    pub fn plan(&self, categories: &[Category], state: &AlertState, now: DateTime<Utc>) -> AlertPlan {
        let progress = MonthProgress::at(now);
        let resolved = resolve(
            categories,
            &self.config.categories,
            &self.config.auto_alerts,
        );
        debug!(
            categories = resolved.len(),
            hours_elapsed = progress.hours_elapsed,
            hours_in_month = progress.hours_in_month,
            "planning alerts"
        );

        let mut plan = AlertPlan::default();

        for (name, entry) in &resolved {
            if !entry.enabled {
                debug!(category = %name, "category disabled, skipping");
                continue;
            }

            for rule in entry.rules {
                let fired = match evaluate(entry.category, entry.spending_limit, rule, &progress) {
                    Ok(fired) => fired,
                    Err(err @ RuleError::MissingGoalData { .. }) => {
                        debug!(category = %name, rule_type = %rule.rule_type, "{err}");
                        plan.skipped.push(Skip {
                            category: name.to_string(),
                            rule_type: rule.rule_type,
                            reason: err.to_string(),
                        });
                        continue;
                    }
                    Err(err) => {
                        warn!(category = %name, rule_type = %rule.rule_type, error = %err, "rule evaluation failed");
                        plan.skipped.push(Skip {
                            category: name.to_string(),
                            rule_type: rule.rule_type,
                            reason: err.to_string(),
                        });
                        continue;
                    }
                };

                for fired in fired {
                    let key = fired.key();
                    if !should_fire(&key, now, rule.min_hours_between_alerts, state) {
                        plan.suppressed.push(key);
                        continue;
                    }
                    info!(
                        category = %name,
                        rule_type = %rule.rule_type,
                        at = %fired.at,
                        severity = %fired.severity,
                        "{}",
                        fired.message
                    );
                    let payload = format_alert(&fired);
                    plan.pending.push(PendingAlert { key, fired, payload });
                }
            }
        }

        info!(
            pending = plan.pending.len(),
            suppressed = plan.suppressed.len(),
            skipped = plan.skipped.len(),
            "alert plan ready"
        );
        plan
    }
}
