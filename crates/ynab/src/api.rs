//! Wire types for the month-categories endpoint and their mapping into
//! [`Category`] snapshots.

use serde::Deserialize;
use tripwire_core::{Category, Milliunits};

/// Top-level response envelope: `{"data": {...}}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesData {
    pub categories: Vec<ApiCategory>,
}

/// One category as returned by the API. Amounts are milliunits; `activity`
/// is negative for outflows.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_group_name: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub budgeted: i64,
    #[serde(default)]
    pub activity: i64,
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub goal_target: Option<i64>,
}

impl ApiCategory {
    /// Whether this category belongs in a snapshot at all.
    pub fn is_active(&self) -> bool {
        !self.hidden && !self.deleted
    }

    pub fn to_category(&self) -> Category {
        let goal_target = self.goal_target.map(Milliunits::new);
        Category {
            name: self.name.clone(),
            goal_target,
            spent_this_month: Milliunits::new((-self.activity).max(0)),
            budgeted: Milliunits::new(self.budgeted),
            has_goal: goal_target.is_some_and(Milliunits::is_positive),
        }
    }
}

/// Parse a response body into active categories.
pub fn parse_categories(body: &str) -> Result<Vec<Category>, serde_json::Error> {
    let envelope: Envelope<CategoriesData> = serde_json::from_str(body)?;
    Ok(envelope
        .data
        .categories
        .iter()
        .filter(|c| c.is_active())
        .map(ApiCategory::to_category)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(activity: i64, goal_target: Option<i64>) -> ApiCategory {
        ApiCategory {
            id: "c1".into(),
            name: "Groceries".into(),
            category_group_name: None,
            hidden: false,
            deleted: false,
            budgeted: 400_000,
            activity,
            balance: 400_000 + activity,
            goal_type: None,
            goal_target,
        }
    }

    #[test]
    fn outflows_become_positive_spend() {
        let category = api(-310_000, Some(400_000)).to_category();
        assert_eq!(category.spent_this_month, Milliunits::from_units(310));
        assert_eq!(category.goal_target, Some(Milliunits::from_units(400)));
        assert!(category.has_goal);
        assert_eq!(category.budgeted, Milliunits::from_units(400));
    }

    #[test]
    fn net_inflow_is_zero_spend() {
        let category = api(25_000, Some(400_000)).to_category();
        assert_eq!(category.spent_this_month, Milliunits::ZERO);
    }

    #[test]
    fn null_or_zero_goal_has_no_goal() {
        let none = api(-1_000, None).to_category();
        assert!(!none.has_goal);
        assert_eq!(none.goal_target, None);

        let zero = api(-1_000, Some(0)).to_category();
        assert!(!zero.has_goal);
        assert_eq!(zero.goal_target, Some(Milliunits::ZERO));
    }

    #[test]
    fn hidden_and_deleted_are_inactive() {
        let mut c = api(0, None);
        assert!(c.is_active());
        c.hidden = true;
        assert!(!c.is_active());
        c.hidden = false;
        c.deleted = true;
        assert!(!c.is_active());
    }
}
