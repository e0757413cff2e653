//! Configuration settings for Toolbelt.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub tokens: TokenSettings,
    pub openai: OpenAISettings,
    pub search: SearchSettings,
    pub wikipedia: WikipediaSettings,
    pub web: WebSettings,
    pub youtube: YoutubeSettings,
    pub display: DisplaySettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Timeout in seconds for outbound HTTP calls.
    pub http_timeout_secs: u64,
    /// User agent sent with outbound HTTP calls.
    pub user_agent: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            http_timeout_secs: 30,
            user_agent: format!("toolbelt/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Token budget applied to command output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Maximum tokens a bounded command result may carry.
    pub limit: usize,
    /// Model whose tokenizer is used to measure payloads.
    pub model: String,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            limit: 4000,
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Chat completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// API key. Falls back to OPENAI_API_KEY.
    pub api_key: Option<String>,
    /// Alternative API base URL (for proxies and compatible servers).
    pub api_base: Option<String>,
    /// Completion model.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            timeout_secs: 300,
        }
    }
}

/// Web search (SerpAPI) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// API key. Falls back to SERP_API_KEY.
    pub api_key: Option<String>,
    /// Search endpoint.
    pub endpoint: String,
    /// Location the search is localised to.
    pub location: String,
    /// Results per page requested from the API.
    pub count: u32,
    /// Number of results requested.
    pub num: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://serpapi.com/search.json".to_string(),
            location: "Delhi,India".to_string(),
            count: 10,
            num: 4,
        }
    }
}

/// Wikipedia settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaSettings {
    /// MediaWiki action API endpoint.
    pub endpoint: String,
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
        }
    }
}

/// Webpage fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    /// Minimum characters a block needs to count as content.
    pub min_block_chars: usize,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self { min_block_chars: 1 }
    }
}

/// YouTube transcript settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Base URL for watch pages.
    pub base_url: String,
    /// Preferred caption languages, most preferred first.
    pub languages: Vec<String>,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            languages: vec!["en".to_string()],
        }
    }
}

/// Chat display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Delay between revealed characters, in milliseconds.
    pub typewriter_delay_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            typewriter_delay_ms: 20,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no command can work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.tokens.limit == 0 {
            return Err(crate::error::ToolbeltError::Config(
                "tokens.limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ToolbeltError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toolbelt")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// OpenAI key from config, then the environment.
    pub fn openai_api_key(&self) -> Option<String> {
        non_empty(self.openai.api_key.clone()).or_else(|| non_empty(std::env::var("OPENAI_API_KEY").ok()))
    }

    /// SerpAPI key from config, then the environment.
    pub fn serp_api_key(&self) -> Option<String> {
        non_empty(self.search.api_key.clone()).or_else(|| non_empty(std::env::var("SERP_API_KEY").ok()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
