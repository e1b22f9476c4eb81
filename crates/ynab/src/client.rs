use chrono::{Datelike, NaiveDate};
use tracing::debug;
use tripwire_core::config::YnabConfig;
use tripwire_core::Category;

use crate::api::parse_categories;
use crate::error::YnabError;

/// Read-only client for the YNAB month-categories endpoint.
pub struct YnabClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl YnabClient {
    pub fn new(token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from runtime config; fails if no token is configured.
    pub fn from_config(config: &YnabConfig) -> Result<Self, YnabError> {
        let token = config
            .require_token()
            .map_err(|e| YnabError::NotConfigured(e.to_string()))?;
        Ok(Self::new(token.to_string(), config.base_url.clone()))
    }

    /// URL of the categories listing for the month containing `month`.
    pub fn categories_url(&self, budget_id: &str, month: NaiveDate) -> String {
        format!(
            "{}/budgets/{}/months/{:04}-{:02}-01/categories",
            self.base_url,
            budget_id,
            month.year(),
            month.month()
        )
    }

    /// Fetch the active categories of `budget_id` for the month containing
    /// `month`.
    pub async fn fetch_categories(
        &self,
        budget_id: &str,
        month: NaiveDate,
    ) -> Result<Vec<Category>, YnabError> {
        let url = self.categories_url(budget_id, month);
        debug!("YNAB request to {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(YnabError::Api { status, body });
        }

        let body = response.text().await?;
        let categories = parse_categories(&body)?;
        debug!(count = categories.len(), "fetched categories");
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_url_uses_first_of_month() {
        let client = YnabClient::new("t".into(), "https://api.ynab.com/v1/".into());
        let month = NaiveDate::from_ymd_opt(2026, 4, 16).unwrap();
        assert_eq!(
            client.categories_url("budget-1", month),
            "https://api.ynab.com/v1/budgets/budget-1/months/2026-04-01/categories"
        );
    }

    #[test]
    fn from_config_requires_token() {
        let config = YnabConfig {
            token: None,
            base_url: "https://api.ynab.com/v1".into(),
        };
        assert!(matches!(
            YnabClient::from_config(&config),
            Err(YnabError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_api_is_http_error() {
        let client = YnabClient::new("t".into(), "http://127.0.0.1:9/v1".into());
        let month = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let result = client.fetch_categories("b", month).await;
        assert!(matches!(result, Err(YnabError::Http(_))));
    }
}
