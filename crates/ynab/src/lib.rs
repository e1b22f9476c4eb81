//! Budgeting API client.
//!
//! Fetches the current month's categories from YNAB and maps them into
//! [`tripwire_core::Category`] snapshots for the rule engine.

pub mod api;
pub mod client;
pub mod error;

pub use client::YnabClient;
pub use error::YnabError;
