//! YAML schema types for the alert rules file.
//!
//! Defines the raw, deserialized configuration:
//! - `AlertsConfig`: top-level document (budget id, auto-alerts, categories)
//! - `CategoryConfig`: explicit per-category rule list
//! - `RuleConfig` / `TriggerConfig`: rule definitions with threshold expressions
//!
//! Threshold expressions stay unparsed here; [`crate::compile`] turns the raw
//! schema into validated rules.

mod alerts;
mod rule;
mod spending_limit;
mod trigger;

pub use alerts::*;
pub use rule::*;
pub use spending_limit::*;
pub use trigger::*;

#[cfg(test)]
mod tests;
