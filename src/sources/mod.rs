//! External collaborators that produce text for commands.
//!
//! Each collaborator sits behind a trait so the dispatcher can be driven by
//! fakes in tests. The production implementations talk to Wikipedia, SerpAPI,
//! arbitrary web pages, YouTube and the OpenAI chat API.

pub mod document;
pub mod files;
mod model;
mod search;
mod web;
mod wikipedia;
mod youtube;

pub use document::{DocumentContent, Table};
pub use model::{ChatRole, ChatTurn, OpenAIModel};
pub use search::SerpApiSearch;
pub use web::HttpPageExtractor;
pub use wikipedia::WikipediaClient;
pub use youtube::{TranscriptSegment, YoutubeTranscripts};

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Encyclopedia lookup.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Plain-text summary of the topic best matching `query`.
    async fn summary(&self, query: &str) -> Result<String>;
}

/// Webpage fetch and main-content extraction.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Extracted content of the page at `url`, serialised as JSON.
    async fn extract(&self, url: &str) -> Result<String>;
}

/// Generic web search.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Ordered organic results for `query`.
    async fn search(&self, query: &str) -> Result<Vec<serde_json::Value>>;
}

/// Video transcript lookup.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Caption segments for a video ID or URL.
    async fn transcript(&self, video: &str) -> Result<Vec<TranscriptSegment>>;
}

/// Chat-completion language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a reply to the conversation so far.
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String>;
}

/// Build the HTTP client shared by all web collaborators.
pub fn http_client(settings: &Settings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.general.http_timeout_secs))
        .user_agent(settings.general.user_agent.clone())
        .build()?;
    Ok(client)
}
