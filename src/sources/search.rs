//! Web search through SerpAPI.

use super::WebSearch;
use crate::config::SearchSettings;
use crate::error::{Result, ToolbeltError};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// SerpAPI-backed search returning Google organic results.
pub struct SerpApiSearch {
    http: reqwest::Client,
    settings: SearchSettings,
    api_key: String,
}

impl SerpApiSearch {
    pub fn new(http: reqwest::Client, settings: &SearchSettings, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| {
            ToolbeltError::Config(
                "SERP_API_KEY not set. Set it with: export SERP_API_KEY='...'".to_string(),
            )
        })?;

        Ok(Self {
            http,
            settings: settings.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl WebSearch for SerpApiSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<serde_json::Value>> {
        // One page only.
        let count = self.settings.count.to_string();
        let num = self.settings.num.to_string();

        let response = self
            .http
            .get(&self.settings.endpoint)
            .query(&[
                ("q", query),
                ("location", self.settings.location.as_str()),
                ("first", "1"),
                ("count", count.as_str()),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let json: serde_json::Value = response.json().await.map_err(|e| {
            ToolbeltError::Search(format!("Unreadable response (HTTP {}): {}", status, e))
        })?;

        if let Some(error) = json.get("error") {
            warn!("Search API reported an error: {}", error);
            return Ok(Vec::new());
        }

        let results = json["organic_results"].as_array().cloned().unwrap_or_default();
        debug!("Search returned {} organic results", results.len());
        Ok(results)
    }
}
