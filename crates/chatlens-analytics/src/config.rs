//! Tunables shared by the analytics passes.

use serde::{Deserialize, Serialize};

/// Analytics settings. Every field has a default, so a partial TOML table
/// (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Substrings that mark a body as an attachment placeholder.
    pub media_markers: Vec<String>,
    /// Emojis kept per participant in the ranking.
    pub top_emojis: usize,
    /// Words kept in the frequency table.
    pub top_words: usize,
    /// Shorter tokens are ignored by the word counter.
    pub min_word_len: usize,
    /// Added to the built-in stop-word list.
    pub extra_stop_words: Vec<String>,
    /// Bins in the response-time histogram.
    pub histogram_bins: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            media_markers: [
                "<Media omitted>",
                "image omitted",
                "video omitted",
                "audio omitted",
                "sticker omitted",
                "GIF omitted",
                "document omitted",
                "<attached:",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            top_emojis: 3,
            top_words: 20,
            min_word_len: 3,
            extra_stop_words: Vec::new(),
            histogram_bins: 30,
        }
    }
}
