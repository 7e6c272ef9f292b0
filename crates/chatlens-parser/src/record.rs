//! Parsed message records and the immutable chat log that holds them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::header::format_timestamp;

/// Sender assigned to service notices that carry no `Sender:` part.
pub const SYSTEM_SENDER: &str = "System";

/// One parsed message event.
///
/// Field names serialize as `Datetime`, `User` and `Message` so downstream
/// consumers can rely on the same column names regardless of which derived
/// columns they add next to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "Datetime")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "User")]
    pub sender: String,
    #[serde(rename = "Message")]
    pub body: String,
    /// The body was extended by lines following the header line.
    #[serde(default)]
    pub continuation: bool,
    /// Service notice (group created, member added, ...) rather than a
    /// participant's message. The sender is then [`SYSTEM_SENDER`].
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub system: bool,
}

impl MessageRecord {
    /// Build a record from a header timestamp and the text after the closing
    /// bracket.
    ///
    /// The first colon separates sender from body; any later colon belongs to
    /// the body. Text without a colon, or with an empty sender before it, is a
    /// service notice.
    pub fn from_header(timestamp: NaiveDateTime, rest: &str) -> Self {
        match rest.split_once(':') {
            Some((sender, body)) if !sender.trim().is_empty() => Self {
                timestamp,
                sender: sender.trim().to_string(),
                body: body.trim().to_string(),
                continuation: false,
                system: false,
            },
            Some((_, body)) => Self::notice(timestamp, body.trim()),
            None => Self::notice(timestamp, rest.trim()),
        }
    }

    fn notice(timestamp: NaiveDateTime, body: &str) -> Self {
        Self {
            timestamp,
            sender: SYSTEM_SENDER.to_string(),
            body: body.to_string(),
            continuation: false,
            system: true,
        }
    }

    pub fn is_system(&self) -> bool {
        self.system
    }

    /// Re-serialize as export text.
    ///
    /// Continuation lines follow the header line on their own lines, so a
    /// single-line message yields exactly one canonical header line.
    ///
    /// A notice whose first line holds a colon is written with an empty
    /// sender (`[stamp] : text`) so it reads back as a notice.
    pub fn to_header_line(&self) -> String {
        let stamp = format_timestamp(&self.timestamp);
        let (first, rest) = match self.body.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (self.body.as_str(), None),
        };
        let mut line = match (self.system, first.is_empty()) {
            (true, true) => format!("[{stamp}]"),
            (true, false) if first.contains(':') => format!("[{stamp}] : {first}"),
            (true, false) => format!("[{stamp}] {first}"),
            (false, true) => format!("[{stamp}] {}:", self.sender),
            (false, false) => format!("[{stamp}] {}: {first}", self.sender),
        };
        if let Some(rest) = rest {
            line.push('\n');
            line.push_str(rest);
        }
        line
    }
}

/// The complete, ordered output of one parse.
///
/// A `ChatLog` is never mutated after construction; operations that reorder
/// or narrow it return a new log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatLog {
    records: Vec<MessageRecord>,
}

impl ChatLog {
    pub fn from_records(records: Vec<MessageRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&MessageRecord> {
        self.records.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<MessageRecord> {
        self.records
    }

    /// Distinct participant names in first-seen order. Service notices are
    /// not participants.
    pub fn participants(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        for record in &self.records {
            if !record.system && seen.insert(record.sender.as_str()) {
                names.push(record.sender.as_str());
            }
        }
        names
    }

    /// Earliest and latest timestamp.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.iter().map(|r| r.timestamp).min()?;
        let last = self.records.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }

    /// A copy ordered by timestamp. Records with equal timestamps keep their
    /// input order.
    pub fn sorted_by_time(&self) -> ChatLog {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.timestamp);
        ChatLog { records }
    }

    /// A copy holding only the records accepted by `keep`, in order.
    pub fn filtered<F>(&self, mut keep: F) -> ChatLog
    where
        F: FnMut(&MessageRecord) -> bool,
    {
        ChatLog {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Re-serialize the whole log as export text, one header line per record
    /// followed by its continuation lines.
    pub fn to_export_text(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_header_line());
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a ChatLog {
    type Item = &'a MessageRecord;
    type IntoIter = std::slice::Iter<'a, MessageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
