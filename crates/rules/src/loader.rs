//! Rules file loader.
//!
//! Reads the YAML rules file, substitutes `${VAR}` references from the
//! environment, deserializes it and compiles it. Every failure here is fatal
//! for the run.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::compile::{compile, CompiledConfig};
use crate::error::{Result, RuleError};
use crate::schema::AlertsConfig;

/// Default location of the rules file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/tripwire.yaml";

/// Load, substitute, parse and compile the rules file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<CompiledConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        RuleError::Configuration(format!("failed to read {}: {e}", path.display()))
    })?;
    let config = parse_config(&text).map_err(|e| e.in_scope(path.display().to_string()))?;
    info!(
        path = %path.display(),
        categories = config.categories.len(),
        auto_alerts = config.auto_alerts.enabled,
        triggers = config.trigger_count(),
        "loaded alert rules"
    );
    Ok(config)
}

/// Parse and compile rules from YAML text, substituting from the process
/// environment.
pub fn parse_config(text: &str) -> Result<CompiledConfig> {
    let raw = parse_raw(text)?;
    compile(&raw)
}

/// Substitute and deserialize without compiling.
pub fn parse_raw(text: &str) -> Result<AlertsConfig> {
    let substituted = substitute_env_vars(text)?;
    Ok(serde_yaml::from_str(&substituted)?)
}

/// Replace every `${VAR}` with the value of the environment variable `VAR`.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    substitute_env_vars_with(input, |name| std::env::var(name).ok())
}

/// Replace every `${VAR}` using `lookup`. An unknown variable or an
/// unclosed reference is a configuration error.
pub fn substitute_env_vars_with<F>(input: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                return Err(RuleError::Configuration(format!(
                    "unclosed env var reference '${{{var_name}'"
                )));
            }
            let name = var_name.trim();
            if name.is_empty() {
                return Err(RuleError::Configuration(
                    "empty env var reference '${}'".to_string(),
                ));
            }
            let value = lookup(name).ok_or_else(|| {
                RuleError::Configuration(format!("env var not found: {name}"))
            })?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
