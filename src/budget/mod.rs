//! Token-bounded formatting of command results.
//!
//! Command output is handed back to a model with a fixed context window, so
//! anything that can grow without bound (web pages, search results, documents,
//! transcripts) goes through [`TokenBudget`] before it is returned.
//!
//! The budget is measured in tokens but the cut is made in characters: a
//! payload whose token length reaches the limit is shortened to its first
//! `limit` characters and is not measured again.

mod encoder;

pub use encoder::{TiktokenEncoder, TokenEncoder};

use crate::error::{Result, ToolbeltError};
use std::sync::Arc;

/// Format `payload` as the result of `label`, cutting it when it would
/// overflow `limit` tokens as measured by `encoder`.
pub fn format_bounded(label: &str, payload: &str, limit: usize, encoder: &dyn TokenEncoder) -> String {
    let payload = if encoder.length(payload) < limit {
        payload
    } else {
        truncate_chars(payload, limit)
    };
    command_result(label, payload)
}

/// Format an unbounded command result.
pub fn command_result(label: &str, payload: &str) -> String {
    format!("Command {} returned: {}", label, payload)
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A token limit paired with the encoder that measures against it.
#[derive(Clone)]
pub struct TokenBudget {
    encoder: Arc<dyn TokenEncoder>,
    limit: usize,
}

impl TokenBudget {
    /// Create a budget. The limit must be positive.
    pub fn new(encoder: Arc<dyn TokenEncoder>, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(ToolbeltError::Config(
                "Token limit must be greater than zero".to_string(),
            ));
        }
        Ok(Self { encoder, limit })
    }

    /// Build the budget described by the token settings.
    pub fn from_settings(settings: &crate::config::TokenSettings) -> Result<Self> {
        let encoder = TiktokenEncoder::for_model(&settings.model)?;
        Self::new(Arc::new(encoder), settings.limit)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Token length of `text`.
    pub fn measure(&self, text: &str) -> usize {
        self.encoder.length(text)
    }

    /// Format `payload` as the bounded result of `label`.
    pub fn format(&self, label: &str, payload: &str) -> String {
        format_bounded(label, payload, self.limit, self.encoder.as_ref())
    }

    /// Measure `measured`, and if it is over budget cut `text` to the limit.
    ///
    /// Used where the text returned wraps the payload that was measured.
    pub fn clip(&self, measured: &str, text: String) -> String {
        if self.measure(measured) < self.limit {
            text
        } else {
            truncate_chars(&text, self.limit).to_string()
        }
    }
}

impl std::fmt::Debug for TokenBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBudget").field("limit", &self.limit).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{CharEncoder, FixedEncoder};
    use super::*;

    #[test]
    fn test_under_limit_is_untouched() {
        let out = format_bounded(
            "wikipedia",
            "Paris is the capital of France.",
            4000,
            &FixedEncoder(8),
        );
        assert_eq!(out, "Command wikipedia returned: Paris is the capital of France.");
    }

    #[test]
    fn test_over_limit_cuts_to_limit_chars() {
        let payload: String = std::iter::repeat("[{\"k\": 1}]").take(5000).collect();
        assert_eq!(payload.len(), 50_000);

        let out = format_bounded("google", &payload, 10_000, &FixedEncoder(20_000));
        let prefix = "Command google returned: ";
        assert!(out.starts_with(prefix));
        assert_eq!(&out[prefix.len()..], &payload[..10_000]);
        assert_eq!(out.chars().count(), prefix.chars().count() + 10_000);
    }

    #[test]
    fn test_limit_equal_to_length_truncates() {
        let out = format_bounded("browse_website", "abcdef", 3, &FixedEncoder(3));
        assert_eq!(out, "Command browse_website returned: abc");

        let out = format_bounded("browse_website", "abcdef", 4, &FixedEncoder(3));
        assert_eq!(out, "Command browse_website returned: abcdef");
    }

    #[test]
    fn test_empty_payload() {
        let out = format_bounded("read", "", 10, &CharEncoder);
        assert_eq!(out, "Command read returned: ");
    }

    #[test]
    fn test_same_inputs_same_output() {
        let payload = "some text that is long enough to be cut";
        let first = format_bounded("x", payload, 5, &CharEncoder);
        let second = format_bounded("x", payload, 5, &CharEncoder);
        assert_eq!(first, second);
        assert_eq!(first, "Command x returned: some ");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let payload = "東京は日本の首都です";
        let out = format_bounded("browse_website", payload, 3, &CharEncoder);
        assert_eq!(out, "Command browse_website returned: 東京は");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 2), "");
    }

    #[test]
    fn test_budget_rejects_zero_limit() {
        assert!(TokenBudget::new(Arc::new(CharEncoder), 0).is_err());
    }

    #[test]
    fn test_budget_clip_measures_inner_text() {
        let budget = TokenBudget::new(Arc::new(CharEncoder), 10).unwrap();

        let wrapped = budget.clip("short", "prefix: \"short\"".to_string());
        assert_eq!(wrapped, "prefix: \"short\"");

        let wrapped = budget.clip("much longer text", "prefix: \"much longer text\"".to_string());
        assert_eq!(wrapped, "prefix: \"m");
    }

    #[test]
    fn test_budget_format_matches_free_function() {
        let budget = TokenBudget::new(Arc::new(CharEncoder), 4).unwrap();
        assert_eq!(budget.limit(), 4);
        assert_eq!(budget.measure("abc"), 3);
        assert_eq!(budget.format("google", "abcdefgh"), "Command google returned: abcd");
    }
}
