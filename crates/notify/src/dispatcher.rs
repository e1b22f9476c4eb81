//! Routes payloads to every configured channel.
//!
//! Individual channel failures don't block other channels. A payload counts
//! as delivered only when every channel accepted it.

use tripwire_core::NotificationPayload;

use crate::traits::{test_payload, DispatchResult, Notifier};

/// Per-channel outcome of delivering one payload.
#[derive(Debug, Clone, Default)]
pub struct Delivery {
    pub results: Vec<DispatchResult>,
}

impl Delivery {
    /// True when at least one channel was tried and none failed.
    pub fn delivered(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Dispatches payloads to a fixed set of channels.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Create an empty dispatcher.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn add_channel(&mut self, channel: Box<dyn Notifier>) {
        self.channels.push(channel);
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.channel_name()).collect()
    }

    /// Deliver a payload to all channels, in order.
    pub async fn deliver(&self, payload: &NotificationPayload) -> Delivery {
        if self.channels.is_empty() {
            tracing::debug!(title = %payload.title, "No notification channels configured");
            return Delivery::default();
        }

        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.send(payload).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::info!(
                        title = %payload.title,
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        title = %payload.title,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                success,
                error,
                duration_ms,
            });
        }

        Delivery { results }
    }

    /// Send the test payload through every channel.
    pub async fn test_notify(&self) -> Delivery {
        self.deliver(&test_payload()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NotifyError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tripwire_core::Priority;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, _payload: &NotificationPayload) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Config("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn mock(name: &str, count: &Arc<AtomicUsize>, should_fail: bool) -> Box<dyn Notifier> {
        Box::new(MockNotifier {
            name: name.to_string(),
            send_count: count.clone(),
            should_fail,
        })
    }

    fn payload() -> NotificationPayload {
        NotificationPayload {
            title: "test".to_string(),
            body: "test body".to_string(),
            priority: Priority::Low,
            icon: "⚠️".to_string(),
        }
    }

    #[tokio::test]
    async fn deliver_to_all_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            mock("a", &count_a, false),
            mock("b", &count_b, false),
        ]);

        let delivery = dispatcher.deliver(&payload()).await;
        assert_eq!(delivery.results.len(), 2);
        assert!(delivery.delivered());
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let failed = Arc::new(AtomicUsize::new(0));
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            mock("fail", &failed, true),
            mock("ok", &count, false),
        ]);

        let delivery = dispatcher.deliver(&payload()).await;
        assert_eq!(delivery.results.len(), 2);
        assert!(!delivery.results[0].success);
        assert!(delivery.results[1].success);
        assert_eq!(count.load(Ordering::SeqCst), 1); // second channel still sent
        assert!(!delivery.delivered());
        let failures: Vec<&str> = delivery.failures().map(|r| r.channel.as_str()).collect();
        assert_eq!(failures, vec!["fail"]);
    }

    #[tokio::test]
    async fn no_channels_is_not_delivered() {
        let dispatcher = Dispatcher::empty();
        let delivery = dispatcher.deliver(&payload()).await;
        assert!(delivery.results.is_empty());
        assert!(!delivery.delivered());
    }

    #[tokio::test]
    async fn test_notify_reaches_every_channel() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::empty();
        dispatcher.add_channel(mock("a", &count, false));
        dispatcher.add_channel(mock("b", &count, false));
        assert_eq!(dispatcher.channel_names(), vec!["a", "b"]);

        assert!(dispatcher.test_notify().await.delivered());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
