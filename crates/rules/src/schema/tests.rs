//! Tests for schema types.

use super::*;
use tripwire_core::{Category, Milliunits};

const FULL_CONFIG_YAML: &str = r#"
budget_id: budget-123
auto_alerts:
  enabled: true
  exclude: [Rent]
  spending_limit: budgeted
  rules:
    - type: goal_threshold
      min_hours_between_alerts: 744
      triggers:
        - at: "90%"
          severity: urgent
categories:
  Groceries:
    spending_limit: 500
    rules:
      - type: goal_threshold
        min_hours_between_alerts: 744
        triggers:
          - { at: "75%", severity: warning }
          - { at: "$50 remaining", severity: urgent }
      - type: pacing
        warm_up_hours: 72
        min_hours_between_alerts: 24
        triggers:
          - { at: "10% over", severity: warning }
  Dining Out:
    enabled: false
    rules: []
"#;

#[test]
fn parse_full_config() {
    let config: AlertsConfig = serde_yaml::from_str(FULL_CONFIG_YAML).unwrap();
    assert_eq!(config.budget_id, "budget-123");

    assert!(config.auto_alerts.enabled);
    assert_eq!(config.auto_alerts.exclude, vec!["Rent"]);
    assert_eq!(config.auto_alerts.spending_limit, SpendingLimit::Budgeted);
    assert_eq!(config.auto_alerts.rules.len(), 1);

    let names: Vec<&str> = config.categories.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Groceries", "Dining Out"]);

    let groceries = &config.categories["Groceries"];
    assert!(groceries.enabled);
    assert_eq!(
        groceries.spending_limit,
        SpendingLimit::Amount(Milliunits::from_units(500))
    );
    assert_eq!(groceries.rules.len(), 2);
    assert_eq!(groceries.rules[0].rule_type, RuleType::GoalThreshold);
    assert_eq!(groceries.rules[0].triggers[1].at, "$50 remaining");
    assert_eq!(groceries.rules[0].triggers[1].severity, Severity::Urgent);
    assert_eq!(groceries.rules[1].rule_type, RuleType::Pacing);
    assert_eq!(groceries.rules[1].warm_up_hours, Some(72.0));

    assert!(!config.categories["Dining Out"].enabled);
}

#[test]
fn category_defaults() {
    let config: CategoryConfig = serde_yaml::from_str("rules: []").unwrap();
    assert!(config.enabled);
    assert_eq!(config.spending_limit, SpendingLimit::Goal);
}

#[test]
fn auto_alerts_default_disabled() {
    let config: AlertsConfig = serde_yaml::from_str("budget_id: b").unwrap();
    assert!(!config.auto_alerts.enabled);
    assert!(config.categories.is_empty());
}

#[test]
fn severity_defaults_to_warning() {
    let trigger: TriggerConfig = serde_yaml::from_str(r#"at: "75%""#).unwrap();
    assert_eq!(trigger.severity, Severity::Warning);
}

#[test]
fn unknown_rule_type_rejected() {
    let yaml = r#"
type: historical_average
min_hours_between_alerts: 24
triggers: []
"#;
    let result: Result<RuleConfig, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn unknown_field_rejected() {
    let yaml = r#"
type: goal_threshold
min_hours_between_alerts: 24
once_per_trigger: true
triggers: []
"#;
    let result: Result<RuleConfig, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn spending_limit_keywords() {
    let parse = |s: &str| serde_yaml::from_str::<SpendingLimit>(s);
    assert_eq!(parse("goal").unwrap(), SpendingLimit::Goal);
    assert_eq!(parse("budgeted").unwrap(), SpendingLimit::Budgeted);
    assert_eq!(parse("auto").unwrap(), SpendingLimit::Budgeted);
    assert_eq!(
        parse("412.5").unwrap(),
        SpendingLimit::Amount(Milliunits::new(412_500))
    );
    assert!(parse("sometimes").is_err());
    assert!(parse("-5").is_err());
}

#[test]
fn spending_limit_resolution() {
    let with_goal = Category {
        name: "Groceries".into(),
        goal_target: Some(Milliunits::from_units(400)),
        spent_this_month: Milliunits::from_units(310),
        budgeted: Milliunits::from_units(1000),
        has_goal: true,
    };
    assert_eq!(
        SpendingLimit::Goal.resolve(&with_goal),
        Some(Milliunits::from_units(400))
    );
    assert_eq!(
        SpendingLimit::Budgeted.resolve(&with_goal),
        Some(Milliunits::from_units(1000))
    );
    assert_eq!(
        SpendingLimit::Amount(Milliunits::from_units(500)).resolve(&with_goal),
        Some(Milliunits::from_units(500))
    );

    let no_goal = Category::without_goal("Misc", Milliunits::ZERO, Milliunits::from_units(10));
    assert_eq!(SpendingLimit::Goal.resolve(&no_goal), None);
    assert_eq!(SpendingLimit::Budgeted.resolve(&no_goal), None);
    assert_eq!(SpendingLimit::Amount(Milliunits::ZERO).resolve(&no_goal), None);
}

#[test]
fn rule_type_round_trips_through_str() {
    for t in [RuleType::GoalThreshold, RuleType::Pacing] {
        assert_eq!(t.as_str().parse::<RuleType>().unwrap(), t);
    }
    assert!("historical_average".parse::<RuleType>().is_err());
}
