//! Notification delivery for budget alerts.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Pushover and generic webhook notifier implementations
//! - Minijinja template rendering for webhook bodies
//! - Dispatcher that delivers each payload to every configured channel

pub mod dispatcher;
pub mod pushover;
pub mod templating;
pub mod traits;
pub mod webhook;

pub use dispatcher::{Delivery, Dispatcher};
pub use pushover::PushoverNotifier;
pub use templating::TemplateRenderer;
pub use traits::{Notifier, NotifyError};
pub use webhook::WebhookNotifier;
