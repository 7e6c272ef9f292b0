//! Analytics over parsed chat logs
//!
//! Everything here reads a [`chatlens_parser::ChatLog`] and never modifies it:
//! - [`DerivedTable`]: per-record hour, weekday, response time, message kind,
//!   sentiment and emojis
//! - activity per participant, per day and per weekday × hour
//! - response-time histogram
//! - emoji and word rankings
//! - sentiment series
//! - interaction network
//! - structured filtering ([`ChatQuery`]) and a one-screen [`ChatSummary`]

use chrono::NaiveDate;
use thiserror::Error;

pub mod activity;
pub mod config;
pub mod derived;
pub mod emoji;
pub mod network;
pub mod query;
pub mod response;
pub mod sentiment;
pub mod summary;
pub mod words;

pub use activity::{
    daily_message_counts, hourly_heatmap, message_kind_counts, user_activity, HourlyHeatmap,
    MessageKindCounts, UserActivity, WEEKDAYS,
};
pub use config::AnalyticsConfig;
pub use derived::{DerivedFields, DerivedTable, MessageKind};
pub use emoji::{extract_emojis, is_emoji, top_emojis_per_user, EmojiCount, UserEmojis};
pub use network::{interaction_edges, InteractionEdge};
pub use query::ChatQuery;
pub use response::{
    response_time_histogram, HistogramBin, ResponseHistogram, MAX_HISTOGRAM_BINS,
};
pub use sentiment::{
    mean_polarity, score_sentiment, sentiment_series, DateRange, Sentiment, SentimentPoint,
};
pub use summary::ChatSummary;
pub use words::{word_frequencies, WordCount};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("histogram needs at least one bin")]
    InvalidBinCount,

    #[error("histogram bin count {requested} exceeds the limit of {max}")]
    TooManyBins { requested: usize, max: usize },

    #[error("date range starts after it ends ({start} > {end})")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}
