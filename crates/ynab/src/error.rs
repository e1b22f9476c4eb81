//! Errors returned by the budgeting API client.

/// Errors that can occur while fetching a budget snapshot.
#[derive(Debug, thiserror::Error)]
pub enum YnabError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("client not configured: {0}")]
    NotConfigured(String),
}
