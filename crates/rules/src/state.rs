//! Persisted alert state: when each trigger last fired.
//!
//! Serialized as `{"last_fired": {"<category>::<rule_type>::<at>": "<RFC 3339>"}}`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::RuleType;

const KEY_SEPARATOR: &str = "::";

/// Identity of a trigger for cooldown purposes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TriggerKey {
    pub category: String,
    pub rule_type: RuleType,
    /// The trigger's `at` expression, trimmed.
    pub at: String,
}

impl TriggerKey {
    pub fn new(category: impl Into<String>, rule_type: RuleType, at: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            rule_type,
            at: at.into(),
        }
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.category, self.rule_type, self.at
        )
    }
}

impl FromStr for TriggerKey {
    type Err = String;

    /// Split from the right so category names may contain the separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, KEY_SEPARATOR);
        let (Some(at), Some(rule_type), Some(category)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("malformed trigger key '{s}'"));
        };
        Ok(Self {
            category: category.to_string(),
            rule_type: rule_type.parse()?,
            at: at.to_string(),
        })
    }
}

impl From<TriggerKey> for String {
    fn from(key: TriggerKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for TriggerKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Last-fired timestamps, one per trigger key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    #[serde(default)]
    last_fired: BTreeMap<TriggerKey, DateTime<Utc>>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fired(&self, key: &TriggerKey) -> Option<DateTime<Utc>> {
        self.last_fired.get(key).copied()
    }

    /// Record a firing. Timestamps never move backwards.
    pub fn record(&mut self, key: TriggerKey, at: DateTime<Utc>) {
        self.last_fired
            .entry(key)
            .and_modify(|existing| *existing = (*existing).max(at))
            .or_insert(at);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TriggerKey, &DateTime<Utc>)> {
        self.last_fired.iter()
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }

    /// Drop entries that last fired strictly before `cutoff`. Returns how
    /// many were removed.
    pub fn prune_fired_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.last_fired.len();
        self.last_fired.retain(|_, fired| *fired >= cutoff);
        before - self.last_fired.len()
    }
}

/// Produce the next state: `prior` with every fired key set to `now`.
///
/// Entries for keys that did not fire are kept unchanged; the prior state is
/// never mutated.
pub fn reconcile<'a>(
    prior: &AlertState,
    fired: impl IntoIterator<Item = &'a TriggerKey>,
    now: DateTime<Utc>,
) -> AlertState {
    let mut next = prior.clone();
    for key in fired {
        next.record(key.clone(), now);
    }
    next
}
