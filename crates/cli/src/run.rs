//! Delivery of a planned set of alerts.

use tracing::{info, warn};
use tripwire_notify::Dispatcher;
use tripwire_rules::{AlertPlan, TriggerKey};

/// Which planned alerts made it out.
#[derive(Debug, Default)]
pub struct Execution {
    pub delivered: Vec<TriggerKey>,
    pub failed: Vec<TriggerKey>,
}

/// Deliver every pending alert, one at a time. In dry-run mode payloads are
/// printed and nothing counts as delivered.
pub async fn execute_plan(plan: &AlertPlan, dispatcher: &Dispatcher, dry_run: bool) -> Execution {
    let mut execution = Execution::default();

    for alert in &plan.pending {
        if dry_run {
            println!("── {} ──", alert.key);
            println!("{}", alert.payload.title);
            println!("{}", alert.payload.body);
            println!();
            continue;
        }

        let delivery = dispatcher.deliver(&alert.payload).await;
        if delivery.delivered() {
            execution.delivered.push(alert.key.clone());
        } else {
            let channels: Vec<&str> = delivery.failures().map(|r| r.channel.as_str()).collect();
            warn!(key = %alert.key, failed_channels = ?channels, "alert not delivered, will retry next run");
            execution.failed.push(alert.key.clone());
        }
    }

    info!(
        delivered = execution.delivered.len(),
        failed = execution.failed.len(),
        dry_run,
        "delivery finished"
    );
    execution
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tripwire_core::{Category, Milliunits, NotificationPayload};
    use tripwire_notify::{Notifier, NotifyError};
    use tripwire_rules::{parse_config, AlertEngine, AlertState};

    /// Accepts everything except payloads whose title contains `reject`.
    struct MockNotifier {
        reject: Option<&'static str>,
        send_count: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            match self.reject {
                Some(word) if payload.title.contains(word) => {
                    Err(NotifyError::Config("mock failure".to_string()))
                }
                _ => Ok(()),
            }
        }
        fn channel_name(&self) -> &str {
            "mock"
        }
    }

    fn plan() -> (AlertPlan, AlertState) {
        let engine = AlertEngine::new(
            parse_config(
                r#"
budget_id: b
auto_alerts:
  enabled: true
  rules:
    - type: goal_threshold
      min_hours_between_alerts: 744
      triggers: [{ at: "75%" }]
"#,
            )
            .unwrap(),
        );
        let snapshot = vec![
            Category::with_goal("Groceries", Milliunits::from_units(400), Milliunits::from_units(310)),
            Category::with_goal("Gas", Milliunits::from_units(200), Milliunits::from_units(190)),
        ];
        let prior = AlertState::new();
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        (engine.plan(&snapshot, &prior, now), prior)
    }

    #[tokio::test]
    async fn failed_delivery_is_not_recorded() {
        let (plan, prior) = plan();
        let count = Arc::new(AtomicUsize::new(0));
        let channels: Vec<Box<dyn Notifier>> = vec![Box::new(MockNotifier {
            reject: Some("Gas"),
            send_count: count.clone(),
        })];
        let dispatcher = Dispatcher::new(channels);

        let execution = execute_plan(&plan, &dispatcher, false).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(execution.failed.len(), 1);
        assert_eq!(execution.failed[0].category, "Gas");

        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        let next = plan.reconcile(&prior, &execution.delivered, now);
        let keys: Vec<String> = next.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["Groceries::goal_threshold::75%"]);
    }

    #[tokio::test]
    async fn dry_run_sends_nothing() {
        let (plan, _) = plan();
        let count = Arc::new(AtomicUsize::new(0));
        let channels: Vec<Box<dyn Notifier>> = vec![Box::new(MockNotifier {
            reject: None,
            send_count: count.clone(),
        })];
        let dispatcher = Dispatcher::new(channels);

        let execution = execute_plan(&plan, &dispatcher, true).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(execution.delivered.is_empty());
        assert!(execution.failed.is_empty());
    }
}
