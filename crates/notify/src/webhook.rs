//! Generic HTTP webhook notifier.
//!
//! Delivers payloads as JSON to a configured URL, or as a body rendered
//! from a minijinja template (for chat services with their own schema).

use std::sync::Arc;

use tripwire_core::config::WebhookConfig;
use tripwire_core::NotificationPayload;

use crate::templating::{TemplateContext, TemplateRenderer};
use crate::traits::{Notifier, NotifyError};

/// POSTs notifications to a webhook endpoint.
#[derive(Debug)]
pub struct WebhookNotifier {
    url: String,
    /// When set, rendered with [`TemplateContext`]; otherwise the payload is
    /// serialized as JSON directly.
    body_template: Option<String>,
    renderer: Arc<TemplateRenderer>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier. The body template's syntax is checked
    /// up front.
    pub fn new(
        url: String,
        body_template: Option<String>,
        renderer: Arc<TemplateRenderer>,
    ) -> Result<Self, NotifyError> {
        if url.trim().is_empty() {
            return Err(NotifyError::Config("webhook URL must not be empty".to_string()));
        }

        if let Some(ref tmpl) = body_template {
            renderer
                .validate(tmpl)
                .map_err(|e| NotifyError::Config(format!("invalid body template: {e}")))?;
        }

        Ok(Self {
            url,
            body_template,
            renderer,
            client: reqwest::Client::new(),
        })
    }

    /// Build from runtime config. `Ok(None)` when no webhook URL is set.
    pub fn from_config(
        config: &WebhookConfig,
        renderer: Arc<TemplateRenderer>,
    ) -> Result<Option<Self>, NotifyError> {
        match &config.url {
            Some(url) => Self::new(url.clone(), config.body_template.clone(), renderer).map(Some),
            None => Ok(None),
        }
    }

    /// The request body for `payload`.
    fn render_body(&self, payload: &NotificationPayload) -> Result<String, NotifyError> {
        match &self.body_template {
            Some(tmpl) => {
                let ctx = TemplateContext::new(payload, chrono::Utc::now().to_rfc3339());
                self.renderer.render(tmpl, &ctx)
            }
            None => serde_json::to_string(payload).map_err(|e| {
                NotifyError::Config(format!("failed to serialize notification: {e}"))
            }),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let body = self.render_body(payload)?;

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                %status,
                body = %body_text,
                "webhook returned non-2xx status"
            );
            return Err(NotifyError::Rejected {
                channel: "webhook".to_string(),
                status: status.as_u16(),
                body: body_text,
            });
        }

        tracing::debug!(url = %self.url, status = %status, "webhook notification delivered");

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripwire_core::Priority;

    fn payload() -> NotificationPayload {
        NotificationPayload {
            title: "⚠️ Tripwire: Groceries".to_string(),
            body: "line one\nline two".to_string(),
            priority: Priority::Low,
            icon: "⚠️".to_string(),
        }
    }

    fn renderer() -> Arc<TemplateRenderer> {
        Arc::new(TemplateRenderer::new())
    }

    #[test]
    fn default_body_is_payload_json() {
        let notifier = WebhookNotifier::new("https://example.com/hook".into(), None, renderer()).unwrap();
        let body: serde_json::Value = serde_json::from_str(&notifier.render_body(&payload()).unwrap()).unwrap();
        assert_eq!(body["title"], "⚠️ Tripwire: Groceries");
        assert_eq!(body["priority"], "low");
    }

    #[test]
    fn templated_body() {
        let notifier = WebhookNotifier::new(
            "https://example.com/hook".into(),
            Some(r#"{"text": {{ (title ~ "\n" ~ body) | json }}}"#.into()),
            renderer(),
        )
        .unwrap();
        let body: serde_json::Value = serde_json::from_str(&notifier.render_body(&payload()).unwrap()).unwrap();
        assert_eq!(body["text"], "⚠️ Tripwire: Groceries\nline one\nline two");
    }

    #[test]
    fn invalid_template_rejected_at_construction() {
        let result = WebhookNotifier::new("https://example.com".into(), Some("{{ oops".into()), renderer());
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }

    #[test]
    fn from_config_without_url_is_none() {
        let config = WebhookConfig {
            url: None,
            body_template: None,
        };
        assert!(WebhookNotifier::from_config(&config, renderer()).unwrap().is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_error() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook".into(), None, renderer()).unwrap();
        assert!(notifier.send(&payload()).await.is_err());
    }
}
