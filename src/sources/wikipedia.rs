//! Wikipedia lookups through the MediaWiki action API.

use super::Encyclopedia;
use crate::config::WikipediaSettings;
use crate::error::{Result, ToolbeltError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Wikipedia client: search for the best title, then fetch its introduction.
pub struct WikipediaClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WikipediaClient {
    pub fn new(http: reqwest::Client, settings: &WikipediaSettings) -> Self {
        Self {
            http,
            endpoint: settings.endpoint.clone(),
        }
    }

    /// Title of the top search hit for `query`.
    async fn best_title(&self, query: &str) -> Result<String> {
        let json: serde_json::Value = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "1"),
                ("srprop", ""),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        json["query"]["search"][0]["title"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ToolbeltError::NotFound(format!("No Wikipedia page matches '{}'", query)))
    }

    /// Plain-text introduction of the page titled `title`.
    async fn intro(&self, title: &str) -> Result<String> {
        let json: serde_json::Value = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let page = json["query"]["pages"]
            .as_object()
            .and_then(|pages| pages.values().next())
            .ok_or_else(|| ToolbeltError::NotFound(format!("Wikipedia page '{}' not found", title)))?;

        if page.get("missing").is_some() {
            return Err(ToolbeltError::NotFound(format!("Wikipedia page '{}' not found", title)));
        }

        page["extract"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ToolbeltError::NotFound(format!("Wikipedia page '{}' has no summary", title)))
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    #[instrument(skip(self))]
    async fn summary(&self, query: &str) -> Result<String> {
        let title = self.best_title(query).await?;
        debug!("Best Wikipedia match: {}", title);
        self.intro(&title).await
    }
}
