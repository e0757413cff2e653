//! Error types for Toolbelt.

use thiserror::Error;

/// Library-level error type for Toolbelt operations.
#[derive(Error, Debug)]
pub enum ToolbeltError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing parameter: '{0}'")]
    MissingParameter(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Content extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),

    #[error("Search API error: {0}")]
    Search(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Toolbelt operations.
pub type Result<T> = std::result::Result<T, ToolbeltError>;
