//! Word frequencies for word-cloud style summaries.

use std::collections::{HashMap, HashSet};

use chatlens_parser::ChatLog;
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::derived::MessageKind;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "but", "by", "can", "could", "did", "do", "does", "doing",
    "don't", "for", "from", "get", "got", "had", "has", "have", "he", "her", "here", "him", "his",
    "how", "i", "i'm", "if", "in", "into", "is", "it", "it's", "its", "just", "let", "like", "me",
    "more", "my", "no", "not", "now", "of", "off", "ok", "okay", "on", "one", "only", "or", "our",
    "out", "over", "she", "should", "so", "some", "still", "than", "that", "that's", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "too", "up", "us",
    "very", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will", "with",
    "would", "yeah", "yes", "you", "you're", "your",
];

/// Chat meta-vocabulary that says nothing about what was discussed.
const CHAT_WORDS: &[&str] = &[
    "text",
    "message",
    "chat",
    "conversation",
    "send",
    "say",
    "told",
    "asked",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

/// The `config.top_words` most frequent words, most frequent first, ties in
/// alphabetical order.
///
/// Words are lowercased. Service notices and media placeholders are skipped,
/// as are stop words and tokens shorter than `config.min_word_len`.
pub fn word_frequencies(log: &ChatLog, config: &AnalyticsConfig) -> Vec<WordCount> {
    let extra: Vec<String> = config
        .extra_stop_words
        .iter()
        .map(|w| w.to_lowercase())
        .collect();
    let excluded: HashSet<&str> = STOP_WORDS
        .iter()
        .chain(CHAT_WORDS)
        .copied()
        .chain(extra.iter().map(String::as_str))
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in log.iter().filter(|r| !r.is_system()) {
        if MessageKind::classify(&record.body, &config.media_markers) == MessageKind::Media {
            continue;
        }
        for raw in record.body.split(|c: char| !is_word_char(c)) {
            let word = raw.trim_matches('\'').to_lowercase();
            if word.chars().count() < config.min_word_len.max(1) {
                continue;
            }
            if excluded.contains(word.as_str()) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(config.top_words);
    words
}
