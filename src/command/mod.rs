//! Typed commands and their parsing from model-issued JSON.

mod dispatch;

pub use dispatch::{Collaborators, Dispatcher, NO_SUBTITLES};

use crate::error::{Result, ToolbeltError};
use crate::sources::ChatTurn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single request to the toolbelt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Summarise the Wikipedia article best matching a query.
    SearchWiki { query: String },

    /// Create or overwrite a file.
    WriteFile { filename: PathBuf, text: String },

    /// Append to a file, creating it if needed.
    AppendFile { filename: PathBuf, text: String },

    /// Read a text file.
    ReadFile { filename: PathBuf },

    /// Fetch a webpage and extract its main content.
    BrowseWebsite { url: String },

    /// Search the web.
    GoogleSearch { query: String },

    /// Fetch the subtitles of a YouTube video.
    YoutubeTranscript { video_id: String },

    /// Extract text or a table from a pdf, docx, xlsx or csv file.
    ExtractDocument { path: PathBuf },

    /// Ask the language model.
    AskModel { messages: Vec<ChatTurn> },

    /// Show a message with a typewriter effect.
    TypeMessage { text: String },
}

impl Command {
    /// Label used in the `Command <label> returned:` prefix.
    pub fn label(&self) -> &'static str {
        match self {
            Command::SearchWiki { .. } => "wikipedia",
            Command::WriteFile { .. } => "write_to_file",
            Command::AppendFile { .. } => "append_to_file",
            Command::ReadFile { .. } => "read_file",
            Command::BrowseWebsite { .. } => "browse_website",
            Command::GoogleSearch { .. } => "google",
            Command::YoutubeTranscript { .. } => "get_youtube_transcript",
            Command::ExtractDocument { .. } => "extract_document",
            Command::AskModel { .. } => "ask_gpt",
            Command::TypeMessage { .. } => "type_message",
        }
    }

    /// Parse a command from a JSON object such as
    /// `{"command": "google", "query": "rust"}`.
    ///
    /// Parameters may sit next to `command` or inside an `args` object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ToolbeltError::InvalidInput(format!("Command is not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Parse a command from an already decoded JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ToolbeltError::InvalidInput(
                "Command must be a JSON object".to_string(),
            ));
        }

        let name = value["command"]
            .as_str()
            .ok_or_else(|| ToolbeltError::MissingParameter("command".to_string()))?;

        let args = if value["args"].is_object() {
            &value["args"]
        } else {
            value
        };

        match name {
            "search_wiki" | "wikipedia" => Ok(Command::SearchWiki {
                query: string_arg(args, "query")?,
            }),
            "write_to_file" | "write_file" => Ok(Command::WriteFile {
                filename: string_arg(args, "filename")?.into(),
                text: string_arg(args, "text")?,
            }),
            "append_to_file" | "append_file" => Ok(Command::AppendFile {
                filename: string_arg(args, "filename")?.into(),
                text: string_arg(args, "text")?,
            }),
            "read_file" => Ok(Command::ReadFile {
                filename: string_arg(args, "filename")?.into(),
            }),
            "browse_website" => Ok(Command::BrowseWebsite {
                url: string_arg(args, "url")?,
            }),
            "google" | "google_tool" | "google_search" => Ok(Command::GoogleSearch {
                query: string_arg(args, "query")?,
            }),
            "get_youtube_transcript" | "youtube_transcript" => Ok(Command::YoutubeTranscript {
                video_id: string_arg(args, "video_id")?,
            }),
            "extract_document" | "get_data" => Ok(Command::ExtractDocument {
                path: string_arg(args, "path")?.into(),
            }),
            "ask_gpt" | "ask_model" => {
                let messages = args
                    .get("messages")
                    .filter(|m| !m.is_null())
                    .ok_or_else(|| ToolbeltError::MissingParameter("messages".to_string()))?;
                let messages: Vec<ChatTurn> = serde_json::from_value(messages.clone())
                    .map_err(|e| ToolbeltError::InvalidInput(format!("Invalid 'messages': {}", e)))?;
                Ok(Command::AskModel { messages })
            }
            "type_message" => Ok(Command::TypeMessage {
                text: string_arg(args, "text")?,
            }),
            other => Err(ToolbeltError::UnknownCommand(other.to_string())),
        }
    }
}

/// Required parameter as a string. Numbers and booleans are stringified.
fn string_arg(args: &serde_json::Value, key: &str) -> Result<String> {
    match args.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Null) | None => Err(ToolbeltError::MissingParameter(key.to_string())),
        Some(other @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => Ok(other.to_string()),
        Some(_) => Err(ToolbeltError::InvalidInput(format!(
            "Parameter '{}' must be a string",
            key
        ))),
    }
}
