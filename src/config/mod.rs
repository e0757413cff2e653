//! Configuration module for Toolbelt.
//!
//! Settings are loaded once at startup and passed to every collaborator.

mod settings;

pub use settings::{
    DisplaySettings, GeneralSettings, OpenAISettings, SearchSettings, Settings, TokenSettings,
    WebSettings, WikipediaSettings, YoutubeSettings,
};
