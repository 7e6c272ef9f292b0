//! Structured record filter.
//!
//! A [`ChatQuery`] holds three independent criteria. Within one criterion any
//! value may match; across criteria all non-empty ones must match. An empty
//! query keeps everything.

use chatlens_parser::{ChatLog, MessageRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatQuery {
    /// Case-insensitive substrings of the sender.
    pub people: Vec<String>,
    /// Calendar dates the record must fall on.
    pub dates: Vec<NaiveDate>,
    /// Case-insensitive substrings of the body.
    pub topics: Vec<String>,
}

impl ChatQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_person(mut self, person: impl Into<String>) -> Self {
        self.people.push(person.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.dates.push(date);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.dates.is_empty() && self.topics.is_empty()
    }

    pub fn matches(&self, record: &MessageRecord) -> bool {
        let people_ok = self.people.is_empty() || contains_any(&record.sender, &self.people);
        let dates_ok = self.dates.is_empty() || self.dates.contains(&record.timestamp.date());
        let topics_ok = self.topics.is_empty() || contains_any(&record.body, &self.topics);
        people_ok && dates_ok && topics_ok
    }

    /// Matching records as a new log, in their original order.
    pub fn apply(&self, log: &ChatLog) -> ChatLog {
        let filtered = log.filtered(|r| self.matches(r));
        tracing::debug!(
            kept = filtered.len(),
            total = log.len(),
            "query applied"
        );
        filtered
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}
