//! Integration tests that verify the shipped example rules file
//! `config/tripwire.example.yaml` loads and compiles.

use tripwire_rules::compile::compile;
use tripwire_rules::loader::substitute_env_vars_with;
use tripwire_rules::schema::{AlertsConfig, RuleType, Severity, SpendingLimit};
use tripwire_rules::threshold::Threshold;
use tripwire_core::Milliunits;

/// Resolve the example file relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn example_path() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../config/tripwire.example.yaml")
}

fn load_example() -> AlertsConfig {
    let path = example_path();
    let yaml = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    let yaml = substitute_env_vars_with(&yaml, |name| {
        (name == "YNAB_BUDGET_ID").then(|| "example-budget".to_string())
    })
    .unwrap_or_else(|e| panic!("Failed to substitute {}: {}", path.display(), e));
    serde_yaml::from_str(&yaml)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

#[test]
fn parse_example_config() {
    let config = load_example();
    assert_eq!(config.budget_id, "example-budget");
    assert!(config.auto_alerts.enabled);
    assert_eq!(config.auto_alerts.exclude, vec!["Rent", "Emergency Fund"]);

    let names: Vec<&str> = config.categories.keys().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["Groceries", "Dining Out", "Fuel", "Subscriptions"]);
}

#[test]
fn example_config_compiles() {
    let compiled = compile(&load_example()).unwrap();

    let groceries = &compiled.categories["Groceries"];
    assert_eq!(groceries.rules.len(), 2);
    assert_eq!(groceries.rules[1].rule_type, RuleType::Pacing);
    assert_eq!(groceries.rules[1].warm_up_hours, 72.0);
    assert_eq!(
        groceries.rules[0].triggers[1].threshold,
        Threshold::AbsoluteRemaining(Milliunits::from_units(50))
    );
    assert_eq!(groceries.rules[0].triggers[1].severity, Severity::Urgent);

    assert_eq!(compiled.categories["Dining Out"].spending_limit, SpendingLimit::Budgeted);
    assert_eq!(
        compiled.categories["Fuel"].spending_limit,
        SpendingLimit::Amount(Milliunits::from_units(250))
    );
    assert!(!compiled.categories["Subscriptions"].enabled);
    assert!(compiled.categories["Subscriptions"].rules.is_empty());
}

#[test]
fn example_config_requires_budget_env_var() {
    let yaml = std::fs::read_to_string(example_path()).unwrap();
    let err = substitute_env_vars_with(&yaml, |_| None).unwrap_err();
    assert!(err.to_string().contains("YNAB_BUDGET_ID"));
}
