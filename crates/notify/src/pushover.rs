//! Pushover push notifier.
//!
//! Posts each payload once per configured user key to the Pushover
//! messages API.

use tripwire_core::config::PushoverConfig;
use tripwire_core::NotificationPayload;

use crate::traits::{Notifier, NotifyError};

/// Pushover messages endpoint.
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Sends notifications via the Pushover API.
#[derive(Debug)]
pub struct PushoverNotifier {
    api_token: String,
    user_keys: Vec<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl PushoverNotifier {
    /// Create a notifier for the given application token and user keys.
    ///
    /// Returns [`NotifyError::Config`] if the token is empty or no user keys
    /// are given.
    pub fn new(api_token: String, user_keys: Vec<String>) -> Result<Self, NotifyError> {
        if api_token.trim().is_empty() {
            return Err(NotifyError::Config(
                "Pushover API token must not be empty".to_string(),
            ));
        }
        if user_keys.is_empty() {
            return Err(NotifyError::Config(
                "at least one Pushover user key is required".to_string(),
            ));
        }
        Ok(Self {
            api_token,
            user_keys,
            endpoint: PUSHOVER_API_URL.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Build from runtime config. `Ok(None)` when Pushover is not configured.
    pub fn from_config(config: &PushoverConfig) -> Result<Option<Self>, NotifyError> {
        match &config.api_token {
            Some(token) if !config.user_keys.is_empty() => {
                Self::new(token.clone(), config.user_keys.clone()).map(Some)
            }
            Some(_) => Err(NotifyError::Config(
                "PUSHOVER_API_TOKEN is set but PUSHOVER_USER_KEYS is empty".to_string(),
            )),
            None => Ok(None),
        }
    }

    /// Override the API endpoint (e.g. for a local test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn user_count(&self) -> usize {
        self.user_keys.len()
    }

    /// Form fields for one message to one user.
    fn form_fields(&self, user_key: &str, payload: &NotificationPayload) -> Vec<(&'static str, String)> {
        vec![
            ("token", self.api_token.clone()),
            ("user", user_key.to_string()),
            ("title", payload.title.clone()),
            ("message", payload.body.clone()),
            ("priority", payload.priority.as_i8().to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl Notifier for PushoverNotifier {
    /// Send to every user key. All keys are attempted; the first failure is
    /// returned.
    async fn send(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let mut first_error = None;

        for (index, user_key) in self.user_keys.iter().enumerate() {
            let result = self
                .client
                .post(&self.endpoint)
                .form(&self.form_fields(user_key, payload))
                .send()
                .await;

            let outcome = match result {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(user = index, "Pushover message accepted");
                    Ok(())
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<unreadable body>".to_string());
                    Err(NotifyError::Rejected {
                        channel: "pushover".to_string(),
                        status,
                        body,
                    })
                }
                Err(e) => Err(NotifyError::Http(e)),
            };

            if let Err(e) = outcome {
                tracing::warn!(user = index, error = %e, "Pushover delivery failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn channel_name(&self) -> &str {
        "pushover"
    }
}
