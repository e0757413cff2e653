//! Toolbelt - commands for assistant agents
//!
//! A small set of named commands an LLM agent can call: Wikipedia lookups,
//! file reads and writes, webpage extraction, web search, YouTube subtitles,
//! document text extraction, chat completions and typewriter-style display.
//!
//! # Overview
//!
//! Each command is one call to an external service. Results that can grow
//! without bound are passed through a token budget before they are returned,
//! so they fit in the context window of the model that asked for them.
//!
//! # Architecture
//!
//! - `budget` - Token counting and bounded result formatting
//! - `command` - Typed commands, JSON parsing and dispatch
//! - `sources` - External collaborators (Wikipedia, web, search, YouTube, documents, LLM)
//! - `display` - Typewriter message rendering
//! - `config` - Configuration management
//! - `cli` - Command-line front end
//!
//! # Example
//!
//! ```rust,no_run
//! use toolbelt::command::{Command, Dispatcher};
//! use toolbelt::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let dispatcher = Dispatcher::from_settings(&settings)?;
//!
//!     let command = Command::from_json(r#"{"command": "wikipedia", "query": "Oslo"}"#)?;
//!     println!("{}", dispatcher.dispatch(&command).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod cli;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod openai;
pub mod sources;

pub use error::{Result, ToolbeltError};
