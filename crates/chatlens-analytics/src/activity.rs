//! Activity aggregates: who talks, on which days, at which hours.

use std::collections::{BTreeMap, HashMap};

use chatlens_parser::ChatLog;
use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::Serialize;

use crate::derived::{DerivedTable, MessageKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserActivity {
    pub user: String,
    pub messages: usize,
}

/// Message count per participant, busiest first, ties by name.
/// Service notices are not counted.
pub fn user_activity(log: &ChatLog) -> Vec<UserActivity> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in log.iter().filter(|r| !r.is_system()) {
        *counts.entry(record.sender.as_str()).or_insert(0) += 1;
    }
    let mut activity: Vec<UserActivity> = counts
        .into_iter()
        .map(|(user, messages)| UserActivity {
            user: user.to_string(),
            messages,
        })
        .collect();
    activity.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.user.cmp(&b.user)));
    activity
}

/// Records per calendar date, ascending.
pub fn daily_message_counts(log: &ChatLog) -> BTreeMap<NaiveDate, usize> {
    let mut days = BTreeMap::new();
    for record in log {
        *days.entry(record.timestamp.date()).or_insert(0) += 1;
    }
    days
}

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Record counts by weekday (rows, Monday first) and hour of day (columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyHeatmap {
    counts: [[usize; 24]; 7],
}

impl HourlyHeatmap {
    pub fn get(&self, weekday: Weekday, hour: u32) -> usize {
        self.counts[weekday.num_days_from_monday() as usize]
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn row(&self, weekday: Weekday) -> &[usize; 24] {
        &self.counts[weekday.num_days_from_monday() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// The busiest `(weekday, hour)` cell; `None` for an empty map.
    pub fn peak(&self) -> Option<(Weekday, u32, usize)> {
        let mut best: Option<(Weekday, u32, usize)> = None;
        for weekday in WEEKDAYS {
            for (hour, &count) in self.row(weekday).iter().enumerate() {
                if count > 0 && best.map_or(true, |(_, _, c)| count > c) {
                    best = Some((weekday, hour as u32, count));
                }
            }
        }
        best
    }
}

pub fn hourly_heatmap(log: &ChatLog) -> HourlyHeatmap {
    let mut counts = [[0usize; 24]; 7];
    for record in log {
        let day = record.timestamp.weekday().num_days_from_monday() as usize;
        let hour = record.timestamp.hour() as usize;
        counts[day][hour] += 1;
    }
    HourlyHeatmap { counts }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageKindCounts {
    pub text: usize,
    pub media: usize,
}

impl MessageKindCounts {
    pub fn total(&self) -> usize {
        self.text + self.media
    }

    /// Percentage of media records; 0 for an empty table.
    pub fn media_share(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.media as f64 * 100.0 / total as f64,
        }
    }

    pub fn text_share(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.text as f64 * 100.0 / total as f64,
        }
    }
}

pub fn message_kind_counts(table: &DerivedTable) -> MessageKindCounts {
    let mut counts = MessageKindCounts::default();
    for row in table.rows() {
        match row.kind {
            MessageKind::Text => counts.text += 1,
            MessageKind::Media => counts.media += 1,
        }
    }
    counts
}
