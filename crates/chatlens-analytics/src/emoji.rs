//! Emoji extraction and per-participant ranking.
//!
//! Emojis are counted per code point. Skin-tone modifiers, zero-width joiners
//! and variation selectors are presentation details and are never counted on
//! their own, so `👍🏽` counts as `👍`.

use std::collections::{BTreeMap, HashMap};

use chatlens_parser::ChatLog;
use serde::Serialize;

/// Whether `c` is a pictographic emoji code point.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F300..=0x1F3FA
            | 0x1F400..=0x1F64F
            | 0x1F680..=0x1F6FF
            | 0x1F7E0..=0x1F7EB
            | 0x1F90C..=0x1F9FF
            | 0x1FA70..=0x1FAFF
            | 0x1F004
            | 0x1F0CF
            | 0x1F18E
            | 0x1F191..=0x1F19A
            | 0x2600..=0x27BF
            | 0x2B50
            | 0x2B55
            | 0x2B1B..=0x2B1C
            | 0x231A..=0x231B
            | 0x23E9..=0x23FA
    )
}

/// Emojis in `text`, in order of appearance, repeats included.
pub fn extract_emojis(text: &str) -> Vec<char> {
    text.chars().filter(|c| is_emoji(*c)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiCount {
    pub emoji: char,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEmojis {
    pub user: String,
    /// Most used first; equal counts ordered by code point.
    pub top: Vec<EmojiCount>,
}

/// The `n` most used emojis of every participant who used any.
///
/// Participants are listed in ascending name order. Service notices are not
/// attributed to anyone.
pub fn top_emojis_per_user(log: &ChatLog, n: usize) -> Vec<UserEmojis> {
    let mut per_user: BTreeMap<&str, HashMap<char, usize>> = BTreeMap::new();
    for record in log.iter().filter(|r| !r.is_system()) {
        for emoji in extract_emojis(&record.body) {
            *per_user
                .entry(record.sender.as_str())
                .or_default()
                .entry(emoji)
                .or_insert(0) += 1;
        }
    }

    per_user
        .into_iter()
        .map(|(user, counts)| {
            let mut top: Vec<EmojiCount> = counts
                .into_iter()
                .map(|(emoji, count)| EmojiCount { emoji, count })
                .collect();
            top.sort_by(|a, b| b.count.cmp(&a.count).then(a.emoji.cmp(&b.emoji)));
            top.truncate(n);
            UserEmojis {
                user: user.to_string(),
                top,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_parser::parse_chat_log;

    #[test]
    fn test_extract_emojis_skips_modifiers() {
        assert_eq!(extract_emojis("great 👍🏽 job 🎉🎉"), vec!['👍', '🎉', '🎉']);
        assert_eq!(extract_emojis("love ❤️ it"), vec!['❤']);
        assert!(extract_emojis("plain text: 100% [ok]").is_empty());
    }

    #[test]
    fn test_top_emojis_per_user() {
        let log = parse_chat_log(
            "[1/2/24, 3:04:05 PM] Bo: 😂😂 nice 🎉\n\
             [1/2/24, 3:05:00 PM] Al: 👍\n\
             [1/2/24, 3:06:00 PM] Bo: 😂 ok 👍 🔥\n\
             [1/2/24, 3:07:00 PM] Cy: no emojis here\n\
             [1/2/24, 3:08:00 PM] Al added 🎉 Cy",
        )
        .unwrap();

        let ranking = top_emojis_per_user(&log, 3);
        assert_eq!(ranking.len(), 2);

        assert_eq!(ranking[0].user, "Al");
        assert_eq!(ranking[0].top, vec![EmojiCount { emoji: '👍', count: 1 }]);

        assert_eq!(ranking[1].user, "Bo");
        let bo: Vec<_> = ranking[1].top.iter().map(|e| (e.emoji, e.count)).collect();
        assert_eq!(bo, vec![('😂', 3), ('🎉', 1), ('👍', 1)]);
    }
}
