//! Budget alert rule engine.
//!
//! This crate provides:
//! - YAML rule definitions with serde deserialization and `${VAR}` substitution
//! - Threshold expression parsing (`"75%"`, `"$50 remaining"`, `"10% over"`)
//! - Category resolution merging auto-derived and explicit configuration
//! - Rule evaluation (goal thresholds and month-end pacing)
//! - Per-trigger cooldowns over persisted last-fired timestamps
//! - Alert formatting into notification payloads
//!
//! Everything here is synchronous and free of network I/O; fetching the
//! budget snapshot, delivering notifications and persisting state are left
//! to the caller.

pub mod alert;
pub mod compile;
pub mod cooldown;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod month;
pub mod resolver;
pub mod schema;
pub mod state;
pub mod threshold;

pub use alert::{format_alert, FiredTrigger, Observation};
pub use compile::{compile, CompiledConfig};
pub use engine::{AlertEngine, AlertPlan, PendingAlert, Skip};
pub use error::RuleError;
pub use loader::{load_config, parse_config};
pub use month::MonthProgress;
pub use schema::{RuleType, Severity, SpendingLimit};
pub use state::{reconcile, AlertState, TriggerKey};
pub use threshold::{Percent, Threshold, ThresholdKind};
