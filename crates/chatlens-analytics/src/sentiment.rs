//! Lexicon sentiment scoring.
//!
//! Each message gets a polarity in `[-1, 1]` and a subjectivity in `[0, 1]`,
//! averaged over the opinion words (and emojis) it contains. Intensifiers
//! ("very", "so") scale the next opinion word; negators ("not", "never")
//! flip and dampen opinion words within the next three tokens.
//!
//! The lexicon is a process-wide table built on first use and never mutated.

use std::collections::HashMap;
use std::sync::OnceLock;

use chatlens_parser::ChatLog;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::derived::DerivedTable;
use crate::AnalyticsError;

/// Multiplier applied to a negated opinion word.
const NEGATION_FACTOR: f64 = -0.5;
/// Tokens after a negator that it still reaches.
const NEGATION_REACH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment {
        polarity: 0.0,
        subjectivity: 0.0,
    };
}

struct Lexicon {
    words: HashMap<&'static str, (f64, f64)>,
    emojis: HashMap<char, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negators: &'static [&'static str],
}

fn lexicon() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    LEXICON.get_or_init(|| Lexicon {
        words: [
            ("good", 0.7, 0.6),
            ("great", 0.8, 0.75),
            ("awesome", 1.0, 1.0),
            ("amazing", 0.6, 0.9),
            ("excellent", 1.0, 1.0),
            ("fantastic", 0.4, 0.9),
            ("wonderful", 1.0, 1.0),
            ("perfect", 1.0, 1.0),
            ("nice", 0.6, 1.0),
            ("love", 0.5, 0.6),
            ("loved", 0.7, 0.8),
            ("like", 0.2, 0.4),
            ("happy", 0.8, 1.0),
            ("glad", 0.5, 1.0),
            ("fun", 0.3, 0.2),
            ("funny", 0.25, 0.75),
            ("cool", 0.35, 0.65),
            ("best", 1.0, 0.3),
            ("better", 0.5, 0.5),
            ("beautiful", 0.85, 1.0),
            ("thanks", 0.2, 0.2),
            ("thank", 0.2, 0.2),
            ("congrats", 0.6, 0.6),
            ("congratulations", 0.6, 0.6),
            ("yay", 0.7, 0.8),
            ("lol", 0.8, 0.7),
            ("haha", 0.2, 0.3),
            ("welcome", 0.8, 0.9),
            ("excited", 0.4, 0.75),
            ("brilliant", 0.9, 1.0),
            ("sweet", 0.35, 0.65),
            ("bad", -0.7, 0.67),
            ("terrible", -1.0, 1.0),
            ("awful", -1.0, 1.0),
            ("horrible", -1.0, 1.0),
            ("worst", -1.0, 1.0),
            ("worse", -0.4, 0.6),
            ("hate", -0.8, 0.9),
            ("sad", -0.5, 1.0),
            ("angry", -0.5, 1.0),
            ("annoying", -0.8, 0.9),
            ("annoyed", -0.4, 0.7),
            ("boring", -1.0, 1.0),
            ("sick", -0.7, 0.86),
            ("sorry", -0.5, 1.0),
            ("wrong", -0.5, 0.9),
            ("late", -0.3, 0.6),
            ("tired", -0.4, 0.7),
            ("stupid", -0.8, 1.0),
            ("ugly", -0.7, 1.0),
            ("upset", -0.6, 0.8),
            ("disappointed", -0.75, 0.75),
            ("fail", -0.5, 0.3),
            ("failed", -0.5, 0.3),
            ("problem", -0.3, 0.3),
            ("ugh", -0.5, 0.8),
            ("miss", -0.2, 0.5),
        ]
        .into_iter()
        .map(|(word, polarity, subjectivity)| (word, (polarity, subjectivity)))
        .collect(),
        emojis: [
            ('😀', 0.6),
            ('😃', 0.6),
            ('😄', 0.7),
            ('😁', 0.6),
            ('😂', 0.5),
            ('🤣', 0.5),
            ('😊', 0.7),
            ('😍', 0.9),
            ('🥰', 0.9),
            ('❤', 0.8),
            ('👍', 0.5),
            ('🎉', 0.7),
            ('😢', -0.6),
            ('😭', -0.6),
            ('😞', -0.6),
            ('😡', -0.8),
            ('😠', -0.7),
            ('💔', -0.7),
            ('👎', -0.5),
        ]
        .into_iter()
        .collect(),
        intensifiers: [
            ("very", 1.3),
            ("really", 1.3),
            ("so", 1.3),
            ("super", 1.3),
            ("extremely", 1.5),
            ("totally", 1.3),
            ("quite", 1.1),
            ("too", 1.2),
            ("slightly", 0.6),
            ("somewhat", 0.8),
        ]
        .into_iter()
        .collect(),
        negators: &[
            "not", "no", "never", "nothing", "nobody", "don't", "dont", "doesn't", "doesnt",
            "didn't", "didnt", "isn't", "isnt", "wasn't", "wasnt", "aren't", "arent", "can't",
            "cant", "won't", "wont", "cannot",
        ],
    })
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('’', "'").to_lowercase())
}

/// Score one message.
pub fn score_sentiment(text: &str) -> Sentiment {
    let lex = lexicon();
    let mut polarities = Vec::new();
    let mut subjectivities = Vec::new();

    let mut intensity = 1.0;
    let mut negation_left = 0usize;

    for token in tokens(text) {
        if lex.negators.contains(&token.as_str()) {
            negation_left = NEGATION_REACH;
            continue;
        }
        if let Some(factor) = lex.intensifiers.get(token.as_str()) {
            intensity *= factor;
            continue;
        }
        if let Some(&(polarity, subjectivity)) = lex.words.get(token.as_str()) {
            let mut score = (polarity * intensity).clamp(-1.0, 1.0);
            if negation_left > 0 {
                score *= NEGATION_FACTOR;
            }
            polarities.push(score);
            subjectivities.push((subjectivity * intensity).clamp(0.0, 1.0));
            intensity = 1.0;
            negation_left = 0;
            continue;
        }
        intensity = 1.0;
        negation_left = negation_left.saturating_sub(1);
    }

    for c in text.chars() {
        if let Some(&polarity) = lex.emojis.get(&c) {
            polarities.push(polarity);
            subjectivities.push(0.8);
        }
    }

    if polarities.is_empty() {
        return Sentiment::NEUTRAL;
    }
    Sentiment {
        polarity: mean(&polarities).clamp(-1.0, 1.0),
        subjectivity: mean(&subjectivities).clamp(0.0, 1.0),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Inclusive calendar-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let date = ts.date();
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentPoint {
    pub timestamp: NaiveDateTime,
    pub polarity: f64,
}

/// Polarity over time, optionally restricted to a date window.
pub fn sentiment_series(
    log: &ChatLog,
    table: &DerivedTable,
    range: Option<DateRange>,
) -> Vec<SentimentPoint> {
    table
        .annotated(log)
        .filter(|(record, _)| range.map_or(true, |r| r.contains(&record.timestamp)))
        .map(|(record, fields)| SentimentPoint {
            timestamp: record.timestamp,
            polarity: fields.polarity,
        })
        .collect()
}

/// Mean polarity of a series; `None` when it is empty.
pub fn mean_polarity(points: &[SentimentPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().map(|p| p.polarity).sum::<f64>() / points.len() as f64)
}
