//! Notifier trait definition and shared error types.

use tripwire_core::{NotificationPayload, Priority};

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{channel} rejected the notification ({status}): {body}")]
    Rejected {
        channel: String,
        status: u16,
        body: String,
    },

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a payload through this channel.
    async fn send(&self, payload: &NotificationPayload) -> Result<(), NotifyError>;

    /// Test connectivity with a sample payload.
    async fn test(&self) -> Result<(), NotifyError> {
        self.send(&test_payload()).await
    }

    /// Human-readable name for this channel (e.g., "pushover", "webhook").
    fn channel_name(&self) -> &str;
}

/// The payload sent by [`Notifier::test`].
pub fn test_payload() -> NotificationPayload {
    NotificationPayload {
        title: "[TEST] Tripwire".to_string(),
        body: "This is a test notification from tripwire budget alerts.".to_string(),
        priority: Priority::Normal,
        icon: "🔔".to_string(),
    }
}

/// Result of delivering a payload to a single channel.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub channel: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
