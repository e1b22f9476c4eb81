//! Top-level alerts document and its sections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::rule::RuleConfig;
use super::spending_limit::SpendingLimit;

/// The whole rules file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlertsConfig {
    /// Budget to fetch categories from (usually `${YNAB_BUDGET_ID}`).
    pub budget_id: String,
    #[serde(default)]
    pub auto_alerts: AutoAlertsConfig,
    /// Explicit rules keyed by exact category name.
    #[serde(default)]
    pub categories: IndexMap<String, CategoryConfig>,
}

/// Rules applied to every category that has a goal, unless excluded or
/// explicitly configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AutoAlertsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub spending_limit: SpendingLimit,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Explicit configuration for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub spending_limit: SpendingLimit,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

pub(crate) fn default_true() -> bool {
    true
}
