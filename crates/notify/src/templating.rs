//! Minijinja template rendering for webhook bodies.
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use tripwire_core::NotificationPayload;

use crate::traits::NotifyError;

/// Context data available to body templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateContext {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Priority label: `"low"`, `"normal"` or `"high"`.
    pub priority: String,
    /// Numeric priority on the push scale (-1, 0, 1).
    pub priority_value: i8,
    /// Current timestamp in RFC 3339 format.
    pub now: String,
}

impl TemplateContext {
    pub fn new(payload: &NotificationPayload, now: impl Into<String>) -> Self {
        Self {
            title: payload.title.clone(),
            body: payload.body.clone(),
            icon: payload.icon.clone(),
            priority: payload.priority.to_string(),
            priority_value: payload.priority.as_i8(),
            now: now.into(),
        }
    }
}

/// Renders body templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment with custom filters and globals.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();

        // Quote a string as a JSON string literal, for JSON bodies.
        env.add_filter("json", json_filter);

        env.add_function("env", env_function);

        env
    }

    /// Render a template string with the given context.
    pub fn render(&self, template_str: &str, ctx: &TemplateContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Check that a template string parses, without evaluating it.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn json_filter(value: String) -> String {
    serde_json::Value::String(value).to_string()
}

/// Global function: read an environment variable by name.
///
/// Returns an empty string (and logs a warning) if the variable is unset.
fn env_function(name: String) -> String {
    match std::env::var(&name) {
        Ok(val) => val,
        Err(_) => {
            tracing::warn!(var = %name, "Environment variable not found, returning empty string");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripwire_core::Priority;

    fn sample_context() -> TemplateContext {
        let payload = NotificationPayload {
            title: "🔴 Tripwire: Groceries".to_string(),
            body: "Groceries: spent $390.00 of $400.00 (98%)\nRemaining: $10.00".to_string(),
            priority: Priority::High,
            icon: "🔴".to_string(),
        };
        TemplateContext::new(&payload, "2026-04-15T12:00:00Z")
    }

    #[test]
    fn render_basic_template() {
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render("{{ title }} [{{ priority }}/{{ priority_value }}]", &sample_context())
            .unwrap();
        assert_eq!(result, "🔴 Tripwire: Groceries [high/1]");
    }

    #[test]
    fn render_json_filter_escapes_newlines() {
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render(r#"{"text": {{ body | json }}}"#, &sample_context())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(
            parsed["text"],
            "Groceries: spent $390.00 of $400.00 (98%)\nRemaining: $10.00"
        );
    }

    #[test]
    fn render_builtin_upper_filter() {
        let renderer = TemplateRenderer::new();
        let result = renderer.render("{{ priority | upper }}", &sample_context()).unwrap();
        assert_eq!(result, "HIGH");
    }

    #[test]
    fn render_env_function() {
        std::env::set_var("TRIPWIRE_NOTIFY_TEST_VAR", "hello_notify");
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render("Env: {{ env('TRIPWIRE_NOTIFY_TEST_VAR') }}", &sample_context())
            .unwrap();
        assert_eq!(result, "Env: hello_notify");
        std::env::remove_var("TRIPWIRE_NOTIFY_TEST_VAR");
    }

    #[test]
    fn render_env_missing_returns_empty() {
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render("Env: [{{ env('DEFINITELY_NOT_SET_XYZ') }}]", &sample_context())
            .unwrap();
        assert_eq!(result, "Env: []");
    }

    #[test]
    fn invalid_template_produces_error() {
        let renderer = TemplateRenderer::new();
        match renderer.render("{{ unclosed", &sample_context()) {
            Err(NotifyError::Template(msg)) => assert!(!msg.is_empty()),
            other => panic!("Expected Template error, got: {:?}", other),
        }
        assert!(renderer.validate("{{ unclosed").is_err());
        assert!(renderer.validate("Hello {{ title }}").is_ok());
    }
}
