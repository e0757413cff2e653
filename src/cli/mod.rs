//! CLI module for Toolbelt.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::command::Command;
use crate::sources::ChatTurn;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Toolbelt - commands for assistant agents
///
/// Look things up on Wikipedia and the web, read and write files, pull video
/// subtitles and document text, and talk to a language model. Every result is
/// printed in the form an agent would receive it.
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarise the Wikipedia article matching a query
    Wiki {
        /// Topic to look up
        query: String,
    },

    /// Write text to a file, replacing its contents
    Write {
        /// File to write
        filename: PathBuf,
        /// Text to write
        text: String,
    },

    /// Append text to a file
    Append {
        /// File to append to
        filename: PathBuf,
        /// Text to append
        text: String,
    },

    /// Print a text file
    Read {
        /// File to read
        filename: PathBuf,
    },

    /// Fetch a webpage and extract its main content
    Browse {
        /// Page URL
        url: String,
    },

    /// Search the web
    Google {
        /// Search query
        query: String,
    },

    /// Fetch the subtitles of a YouTube video
    Transcript {
        /// YouTube URL or video ID
        video: String,
    },

    /// Extract text from a pdf, docx, xlsx or csv file
    Extract {
        /// Document path
        path: PathBuf,
    },

    /// Ask the language model a question
    Ask {
        /// The prompt to send
        prompt: String,

        /// Optional system prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show a message with a typewriter effect
    Type {
        /// Message to display
        text: String,
    },

    /// Run a JSON command, e.g. '{"command": "google", "query": "rust"}' ('-' reads stdin)
    Run {
        /// Command JSON
        json: String,
    },

    /// Check configuration and API keys
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Commands {
    /// The toolbelt command this subcommand maps to, if it maps to one.
    pub fn to_command(&self) -> Option<Command> {
        let command = match self {
            Commands::Wiki { query } => Command::SearchWiki {
                query: query.clone(),
            },
            Commands::Write { filename, text } => Command::WriteFile {
                filename: filename.clone(),
                text: text.clone(),
            },
            Commands::Append { filename, text } => Command::AppendFile {
                filename: filename.clone(),
                text: text.clone(),
            },
            Commands::Read { filename } => Command::ReadFile {
                filename: filename.clone(),
            },
            Commands::Browse { url } => Command::BrowseWebsite { url: url.clone() },
            Commands::Google { query } => Command::GoogleSearch {
                query: query.clone(),
            },
            Commands::Transcript { video } => Command::YoutubeTranscript {
                video_id: video.clone(),
            },
            Commands::Extract { path } => Command::ExtractDocument { path: path.clone() },
            Commands::Ask { prompt, system, .. } => {
                let mut messages = Vec::new();
                if let Some(system) = system {
                    messages.push(ChatTurn::system(system.clone()));
                }
                messages.push(ChatTurn::user(prompt.clone()));
                Command::AskModel { messages }
            }
            Commands::Type { text } => Command::TypeMessage { text: text.clone() },
            Commands::Run { .. } | Commands::Doctor | Commands::Config { .. } => return None,
        };
        Some(command)
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
