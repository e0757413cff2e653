//! Pre-flight checks before calling paid APIs.
//!
//! Validates that required keys are configured before a command is sent,
//! so a missing key is reported plainly instead of as an HTTP 401.

use crate::command::Command;
use crate::config::Settings;
use crate::error::{Result, ToolbeltError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Model calls require an OpenAI key.
    Model,
    /// Web search requires a SerpAPI key.
    Search,
    /// Everything else needs no credentials.
    Open,
}

impl Operation {
    /// What `command` needs before it can run.
    pub fn for_command(command: &Command) -> Self {
        match command {
            Command::AskModel { .. } => Operation::Model,
            Command::GoogleSearch { .. } => Operation::Search,
            _ => Operation::Open,
        }
    }
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Model => check_key(settings.openai_api_key(), "OPENAI_API_KEY", "sk-..."),
        Operation::Search => check_key(settings.serp_api_key(), "SERP_API_KEY", "..."),
        Operation::Open => Ok(()),
    }
}

fn check_key(key: Option<String>, var: &str, example: &str) -> Result<()> {
    match key {
        Some(_) => Ok(()),
        None => Err(ToolbeltError::Config(format!(
            "{} not set. Set it with: export {}='{}'",
            var, var, example
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_commands_have_no_requirements() {
        let command = Command::ReadFile {
            filename: "notes.txt".into(),
        };
        let operation = Operation::for_command(&command);
        assert_eq!(operation, Operation::Open);
        assert!(check(operation, &Settings::default()).is_ok());
    }

    #[test]
    fn test_search_needs_key() {
        let command = Command::GoogleSearch {
            query: "rust".to_string(),
        };
        assert_eq!(Operation::for_command(&command), Operation::Search);

        let mut settings = Settings::default();
        settings.search.api_key = Some("serp".to_string());
        assert!(check(Operation::Search, &settings).is_ok());
    }
}
