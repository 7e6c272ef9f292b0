//! Whole-chat overview used by the `summary` report.

use chatlens_parser::ChatLog;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::activity::{daily_message_counts, user_activity, UserActivity};
use crate::config::AnalyticsConfig;
use crate::derived::MessageKind;

/// One-screen overview of a parsed chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSummary {
    pub records: usize,
    pub participants: Vec<String>,
    pub notices: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    pub text_messages: usize,
    pub media_messages: usize,
    /// Records whose body spans more than one export line.
    pub continued: usize,
    pub busiest_user: Option<UserActivity>,
    pub busiest_day: Option<(NaiveDate, usize)>,
}

impl ChatSummary {
    pub fn from_log(log: &ChatLog, config: &AnalyticsConfig) -> Self {
        let media_messages = log
            .iter()
            .filter(|r| MessageKind::classify(&r.body, &config.media_markers) == MessageKind::Media)
            .count();

        // Earliest date wins a tie.
        let busiest_day = daily_message_counts(log)
            .into_iter()
            .fold(None, |best: Option<(NaiveDate, usize)>, (day, count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((day, count)),
            });

        let span = log.span();
        Self {
            records: log.len(),
            participants: log.participants().into_iter().map(str::to_string).collect(),
            notices: log.iter().filter(|r| r.is_system()).count(),
            first: span.map(|(first, _)| first),
            last: span.map(|(_, last)| last),
            text_messages: log.len() - media_messages,
            media_messages,
            continued: log.iter().filter(|r| r.continuation).count(),
            busiest_user: user_activity(log).into_iter().next(),
            busiest_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_parser::parse_chat_log;

    #[test]
    fn test_summary() {
        let log = parse_chat_log(
            "[5/1/24, 8:00:00 AM] Al created group \"Trip\"\n\
             [5/1/24, 8:01:00 AM] Al: plan:\n\
             - tickets\n\
             - hotel\n\
             [5/1/24, 8:02:00 AM] Bo: <Media omitted>\n\
             [5/2/24, 7:00:00 PM] Al: done\n\
             [5/3/24, 7:00:00 PM] Bo: thanks\n\
             [5/3/24, 7:01:00 PM] Bo: see you",
        )
        .unwrap();
        let summary = ChatSummary::from_log(&log, &AnalyticsConfig::default());

        assert_eq!(summary.records, 6);
        assert_eq!(summary.participants, vec!["Al", "Bo"]);
        assert_eq!(summary.notices, 1);
        assert_eq!(summary.media_messages, 1);
        assert_eq!(summary.text_messages, 5);
        assert_eq!(summary.continued, 1);
        assert_eq!(
            summary.busiest_user,
            Some(UserActivity {
                user: "Bo".into(),
                messages: 3
            })
        );
        assert_eq!(
            summary.busiest_day,
            Some((NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 3))
        );
        assert_eq!(summary.first, log.span().map(|(f, _)| f));
    }

    #[test]
    fn test_empty_log() {
        let summary = ChatSummary::from_log(&ChatLog::default(), &AnalyticsConfig::default());
        assert_eq!(summary.records, 0);
        assert!(summary.busiest_user.is_none());
        assert!(summary.busiest_day.is_none());
        assert!(summary.first.is_none());
    }
}
