//! Command execution.

use super::Command;
use crate::budget::{command_result, TokenBudget};
use crate::config::Settings;
use crate::display::{MessageSurface, TerminalSurface, Typewriter};
use crate::error::{Result, ToolbeltError};
use crate::sources::{
    document, files, http_client, DocumentContent, Encyclopedia, HttpPageExtractor, LanguageModel,
    OpenAIModel, PageExtractor, SerpApiSearch, TranscriptSource, WebSearch, WikipediaClient,
    YoutubeTranscripts,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Returned in place of any transcript failure.
pub const NO_SUBTITLES: &str = "The video does not have any subtitles";

/// The external services commands call into.
pub struct Collaborators {
    pub encyclopedia: Arc<dyn Encyclopedia>,
    pub pages: Arc<dyn PageExtractor>,
    /// Absent when no search API key is configured.
    pub search: Option<Arc<dyn WebSearch>>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub model: Arc<dyn LanguageModel>,
}

impl Collaborators {
    /// Build the production collaborators described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = http_client(settings)?;

        let search: Option<Arc<dyn WebSearch>> = match settings.serp_api_key() {
            Some(key) => Some(Arc::new(SerpApiSearch::new(http.clone(), &settings.search, Some(key))?)),
            None => None,
        };

        let model = OpenAIModel::new(&settings.openai, settings.openai_api_key())?;
        debug!("Chat model: {}", model.model());

        Ok(Self {
            encyclopedia: Arc::new(WikipediaClient::new(http.clone(), &settings.wikipedia)),
            pages: Arc::new(HttpPageExtractor::new(http.clone(), &settings.web)),
            search,
            transcripts: Arc::new(YoutubeTranscripts::new(http, &settings.youtube)?),
            model: Arc::new(model),
        })
    }
}

/// Runs commands against the collaborators, bounding output with the budget.
pub struct Dispatcher {
    collaborators: Collaborators,
    budget: TokenBudget,
    typewriter: Typewriter,
    surface: Mutex<Box<dyn MessageSurface + Send>>,
}

impl Dispatcher {
    pub fn new(
        collaborators: Collaborators,
        budget: TokenBudget,
        typewriter: Typewriter,
        surface: Box<dyn MessageSurface + Send>,
    ) -> Self {
        Self {
            collaborators,
            budget,
            typewriter,
            surface: Mutex::new(surface),
        }
    }

    /// Production dispatcher typing messages to the terminal.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            Collaborators::from_settings(settings)?,
            TokenBudget::from_settings(&settings.tokens)?,
            Typewriter::from_settings(&settings.display),
            Box::new(TerminalSurface::stdout()),
        ))
    }

    /// Execute one command and return its result string.
    pub async fn dispatch(&self, command: &Command) -> Result<String> {
        info!("{} called", command.label());

        match command {
            Command::SearchWiki { query } => {
                let summary = self.collaborators.encyclopedia.summary(query).await?;
                Ok(command_result(command.label(), &summary))
            }

            Command::WriteFile { filename, text } => {
                files::write(filename, text).await?;
                Ok(command_result(command.label(), "File was written successfully"))
            }

            Command::AppendFile { filename, text } => {
                files::append(filename, text).await?;
                Ok(command_result(command.label(), "File was appended successfully"))
            }

            Command::ReadFile { filename } => {
                let data = files::read(filename).await?;
                Ok(command_result(command.label(), &data))
            }

            Command::BrowseWebsite { url } => {
                let content = self.collaborators.pages.extract(url).await?;
                Ok(self.budget.format(command.label(), &content))
            }

            Command::GoogleSearch { query } => {
                let search = self.collaborators.search.as_ref().ok_or_else(|| {
                    ToolbeltError::Config(
                        "SERP_API_KEY not set. Set it with: export SERP_API_KEY='...'".to_string(),
                    )
                })?;
                let results = search.search(query).await?;
                let response = serde_json::to_string_pretty(&results)?;
                Ok(self.budget.format(command.label(), &response))
            }

            Command::YoutubeTranscript { video_id } => Ok(self.transcript(video_id).await),

            Command::ExtractDocument { path } => match document::extract_path(path).await? {
                DocumentContent::Text(text) => Ok(self.budget.format(command.label(), &text)),
                DocumentContent::Table(table) => Ok(table.render()),
            },

            Command::AskModel { messages } => self.collaborators.model.complete(messages).await,

            Command::TypeMessage { text } => {
                let mut surface = self.surface.lock().await;
                self.typewriter.type_out(&mut **surface, text.chars()).await?;
                Ok(command_result(command.label(), "Message was displayed"))
            }
        }
    }

    /// Subtitles of a video, or the fixed fallback when there are none.
    async fn transcript(&self, video_id: &str) -> String {
        match self.collaborators.transcripts.transcript(video_id).await {
            Ok(segments) => {
                let text = segments
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                self.budget
                    .clip(&text, format!("Here are the video subtitles: \"{}\"", text))
            }
            Err(e) => {
                warn!("Transcript fetch failed for {}: {}", video_id, e);
                NO_SUBTITLES.to_string()
            }
        }
    }
}
