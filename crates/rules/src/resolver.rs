//! Category resolution: which categories are evaluated this run, and with
//! which rules.
//!
//! Auto-derived entries come from every category with a goal (minus the
//! exclude list). Explicit configuration then replaces any auto entry of the
//! same name wholesale. Explicit names missing from the snapshot are skipped:
//! the budget is the source of truth for which categories exist.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use tracing::{debug, warn};
use tripwire_core::Category;

use crate::compile::{CompiledAutoAlerts, CompiledCategory, CompiledRule};
use crate::schema::SpendingLimit;

/// Where a resolved category's rules came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    Explicit,
    Auto,
}

/// A category selected for evaluation, paired with its effective rules.
#[derive(Debug, Clone)]
pub struct ResolvedCategory<'a> {
    pub category: &'a Category,
    pub source: RuleSource,
    pub enabled: bool,
    pub spending_limit: SpendingLimit,
    pub rules: &'a [CompiledRule],
}

/// Merge auto-derived and explicit category configuration against a snapshot.
///
/// The output is keyed by category name, so names are unique; an explicit
/// entry always wins over an auto-derived one.
pub fn resolve<'a>(
    categories: &'a [Category],
    explicit: &'a IndexMap<String, CompiledCategory>,
    auto: &'a CompiledAutoAlerts,
) -> BTreeMap<&'a str, ResolvedCategory<'a>> {
    let mut by_name: HashMap<&str, &Category> = HashMap::with_capacity(categories.len());
    for category in categories {
        if by_name.insert(category.name.as_str(), category).is_some() {
            warn!(category = %category.name, "duplicate category name in snapshot, keeping the last one");
        }
    }

    let mut resolved = BTreeMap::new();

    if auto.enabled {
        for (&name, &category) in &by_name {
            if !category.has_goal || auto.exclude.contains(name) {
                continue;
            }
            resolved.insert(
                name,
                ResolvedCategory {
                    category,
                    source: RuleSource::Auto,
                    enabled: true,
                    spending_limit: auto.spending_limit,
                    rules: &auto.rules,
                },
            );
        }
        debug!(count = resolved.len(), "auto-derived categories");
    }

    for (name, config) in explicit {
        let Some(&category) = by_name.get(name.as_str()) else {
            warn!(category = %name, "configured category not found in budget, skipping");
            continue;
        };
        resolved.insert(
            category.name.as_str(),
            ResolvedCategory {
                category,
                source: RuleSource::Explicit,
                enabled: config.enabled,
                spending_limit: config.spending_limit,
                rules: &config.rules,
            },
        );
    }

    resolved
}
