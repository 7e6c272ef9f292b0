//! Derived columns.
//!
//! A [`DerivedTable`] is an additive projection over a [`ChatLog`]: one row of
//! [`DerivedFields`] per record, aligned by index. Computing it never touches
//! the log, so any number of analytics can be layered over the same parse.

use chatlens_parser::{ChatLog, MessageRecord};
use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::emoji::extract_emojis;
use crate::sentiment::score_sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Media,
}

impl MessageKind {
    pub fn classify(body: &str, media_markers: &[String]) -> Self {
        if media_markers.iter().any(|m| body.contains(m.as_str())) {
            MessageKind::Media
        } else {
            MessageKind::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFields {
    #[serde(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Weekday")]
    pub weekday: Weekday,
    /// Seconds until the next record; `None` for the last one.
    #[serde(rename = "Response_time")]
    pub response_time_secs: Option<i64>,
    #[serde(rename = "Message_Type")]
    pub kind: MessageKind,
    #[serde(rename = "Polarity")]
    pub polarity: f64,
    #[serde(rename = "Subjectivity")]
    pub subjectivity: f64,
    #[serde(rename = "Emojis")]
    pub emojis: Vec<char>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedTable {
    rows: Vec<DerivedFields>,
}

impl DerivedTable {
    pub fn compute(log: &ChatLog, config: &AnalyticsConfig) -> Self {
        let records = log.records();
        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let sentiment = score_sentiment(&record.body);
                DerivedFields {
                    hour: record.timestamp.hour(),
                    weekday: record.timestamp.weekday(),
                    response_time_secs: records
                        .get(idx + 1)
                        .map(|next| (next.timestamp - record.timestamp).num_seconds()),
                    kind: MessageKind::classify(&record.body, &config.media_markers),
                    polarity: sentiment.polarity,
                    subjectivity: sentiment.subjectivity,
                    emojis: extract_emojis(&record.body),
                }
            })
            .collect();
        tracing::debug!(rows = records.len(), "derived columns computed");
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DerivedFields] {
        &self.rows
    }

    pub fn get(&self, idx: usize) -> Option<&DerivedFields> {
        self.rows.get(idx)
    }

    /// Pair every record with its derived row.
    ///
    /// `log` must be the log the table was computed from.
    pub fn annotated<'a>(
        &'a self,
        log: &'a ChatLog,
    ) -> impl Iterator<Item = (&'a MessageRecord, &'a DerivedFields)> + 'a {
        debug_assert_eq!(log.len(), self.rows.len());
        log.iter().zip(self.rows.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_parser::parse_chat_log;

    #[test]
    fn test_compute_aligns_with_log() {
        let log = parse_chat_log(
            "[1/6/24, 11:59:00 PM] Al: great news 🎉\n\
             [1/7/24, 12:01:30 AM] Bo: <Media omitted>\n\
             [1/7/24, 12:02:00 AM] Al: ok",
        )
        .unwrap();
        let before = log.clone();
        let table = DerivedTable::compute(&log, &AnalyticsConfig::default());

        assert_eq!(table.len(), 3);
        assert_eq!(log, before, "deriving columns leaves the log untouched");

        let first = table.get(0).unwrap();
        assert_eq!(first.hour, 23);
        assert_eq!(first.weekday, Weekday::Sat);
        assert_eq!(first.response_time_secs, Some(150));
        assert_eq!(first.kind, MessageKind::Text);
        assert!(first.polarity > 0.0);
        assert_eq!(first.emojis, vec!['🎉']);

        let second = table.get(1).unwrap();
        assert_eq!(second.hour, 0);
        assert_eq!(second.weekday, Weekday::Sun);
        assert_eq!(second.kind, MessageKind::Media);
        assert_eq!(second.response_time_secs, Some(30));

        assert_eq!(table.get(2).unwrap().response_time_secs, None);
        assert_eq!(table.annotated(&log).count(), 3);
    }

    #[test]
    fn test_custom_media_markers() {
        let markers = vec!["[photo]".to_string()];
        assert_eq!(MessageKind::classify("look [photo]", &markers), MessageKind::Media);
        assert_eq!(MessageKind::classify("<Media omitted>", &markers), MessageKind::Text);
    }

    #[test]
    fn test_serialized_column_names() {
        let log = parse_chat_log("[1/2/24, 3:04:05 PM] Al: hi").unwrap();
        let table = DerivedTable::compute(&log, &AnalyticsConfig::default());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["Hour"], 15);
        assert!(json[0]["Response_time"].is_null());
        assert_eq!(json[0]["Message_Type"], "text");
    }
}
