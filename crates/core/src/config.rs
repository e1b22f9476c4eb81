use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::TripwireError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() { "set" } else { "(none)" }
}

// ── Top-level config ──────────────────────────────────────────

/// Runtime settings for the external collaborators (budget API, push
/// service, state storage). Alert rules live in the YAML rules file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub ynab: YnabConfig,
    pub pushover: PushoverConfig,
    pub webhook: WebhookConfig,
    pub state: StateConfig,
    pub aws: AwsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TRIPWIRE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TRIPWIRE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            ynab: YnabConfig::from_env_profiled(p),
            pushover: PushoverConfig::from_env_profiled(p),
            webhook: WebhookConfig::from_env_profiled(p),
            state: StateConfig::from_env_profiled(p),
            aws: AwsConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  ynab:      base_url={}, token={}", self.ynab.base_url, redact(&self.ynab.token));
        tracing::info!(
            "  pushover:  token={}, users={}",
            redact(&self.pushover.api_token),
            self.pushover.user_keys.len()
        );
        tracing::info!("  webhook:   url={}", redact(&self.webhook.url));
        tracing::info!(
            "  state:     dir={}, key={}, bucket={}",
            self.state.dir.display(),
            self.state.key,
            self.aws.s3_bucket.as_deref().unwrap_or("(none)")
        );
    }
}

// ── YNAB ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YnabConfig {
    pub token: Option<String>,
    pub base_url: String,
}

impl YnabConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            token: profiled_env_opt(p, "YNAB_TOKEN"),
            base_url: profiled_env_or(p, "YNAB_BASE_URL", "https://api.ynab.com/v1"),
        }
    }

    /// The API token, or a `MissingConfig` error naming the variable.
    pub fn require_token(&self) -> Result<&str, TripwireError> {
        self.token
            .as_deref()
            .ok_or_else(|| TripwireError::MissingConfig("YNAB_TOKEN".to_string()))
    }
}

// ── Pushover ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushoverConfig {
    pub api_token: Option<String>,
    pub user_keys: Vec<String>,
}

impl PushoverConfig {
    fn from_env_profiled(p: &str) -> Self {
        let user_keys = profiled_env_opt(p, "PUSHOVER_USER_KEYS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();
        Self {
            api_token: profiled_env_opt(p, "PUSHOVER_API_TOKEN"),
            user_keys,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_token.is_some() && !self.user_keys.is_empty()
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ── Webhook ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub body_template: Option<String>,
}

impl WebhookConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_opt(p, "ALERT_WEBHOOK_URL"),
            body_template: profiled_env_opt(p, "ALERT_WEBHOOK_TEMPLATE"),
        }
    }
}

// ── State storage ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Local directory holding the state object when no bucket is configured.
    pub dir: PathBuf,
    /// Object key of the state blob (relative to `dir` or the S3 prefix).
    pub key: String,
}

impl StateConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "STATE_DIR", "data/state")),
            key: profiled_env_or(p, "STATE_KEY", "state.json"),
        }
    }
}

// ── AWS / S3 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            s3_bucket: profiled_env_opt(p, "S3_BUCKET"),
            s3_prefix: profiled_env_opt(p, "S3_PREFIX"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.s3_bucket.is_some()
    }
}
