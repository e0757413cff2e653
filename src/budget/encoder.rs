//! Token counting for OpenAI-style models.

use crate::error::{Result, ToolbeltError};
use tiktoken_rs::{cl100k_base, o200k_base, p50k_base, r50k_base, CoreBPE};

/// Measures how many tokens a string occupies in a model's context window.
pub trait TokenEncoder: Send + Sync {
    /// Number of tokens `text` encodes to.
    fn length(&self, text: &str) -> usize;
}

/// Token encoder backed by tiktoken.
pub struct TiktokenEncoder {
    model: String,
    bpe: CoreBPE,
}

impl TiktokenEncoder {
    /// Create an encoder matching the tokenizer of `model`.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = Self::bpe_for_model(model)
            .map_err(|e| ToolbeltError::Config(format!("Failed to load tokenizer for {}: {}", model, e)))?;

        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    fn bpe_for_model(model: &str) -> anyhow::Result<CoreBPE> {
        match model {
            name if name.starts_with("gpt-4o") || name.starts_with("o1") || name.starts_with("o3") => {
                o200k_base()
            }
            name if name.starts_with("gpt-4") || name.starts_with("gpt-3.5") => cl100k_base(),
            name if name.starts_with("text-davinci") || name.starts_with("code-") => p50k_base(),
            name if name.starts_with("davinci") || name.starts_with("curie") => r50k_base(),
            _ => cl100k_base(),
        }
    }

    /// Model this encoder was selected for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TokenEncoder for TiktokenEncoder {
    fn length(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_tokens() {
        let encoder = TiktokenEncoder::for_model("gpt-3.5-turbo").unwrap();
        let count = encoder.length("Paris is the capital of France.");
        assert!(count > 0 && count < 12);
        assert_eq!(encoder.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_empty_text() {
        let encoder = TiktokenEncoder::for_model("gpt-4").unwrap();
        assert_eq!(encoder.length(""), 0);
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let encoder = TiktokenEncoder::for_model("some-local-model").unwrap();
        assert!(encoder.length("hello world") > 0);
    }
}
