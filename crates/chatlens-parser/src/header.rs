//! Header-line recognition and timestamp resolution.
//!
//! A header line opens a new message. Its bracketed prefix is the only
//! locale-sensitive part of an export line:
//!
//! ```text
//! [M/D/YY, H:MM:SS AM] Sender: message text
//! [1/2/24, 3:04:05 PM] Alice: hello
//! [12/31/23, 11:59:59 PM] Alice created group "Weekend"
//! ```
//!
//! Month, day and hour may be one or two digits; the year is exactly two
//! digits and always resolves into the 2000s (`24` → `2024`). Minutes and
//! seconds are always two digits. Any single whitespace character may separate
//! the seconds from the meridiem (exports use U+202F NARROW NO-BREAK SPACE).

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::{Captures, Regex};
use thiserror::Error;

/// Century applied to every two-digit year.
pub const CENTURY_BASE: i32 = 2000;

/// Characters that exporters leave at the start of lines and that never carry
/// content: byte-order mark and LEFT-TO-RIGHT MARK.
const INVISIBLE_PREFIXES: &[char] = &['\u{feff}', '\u{200e}'];

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(
            r"^\[([0-9]{1,2})/([0-9]{1,2})/([0-9]{2}), ([0-9]{1,2}):([0-9]{2}):([0-9]{2})\s([AP]M)\]",
        )
        .expect("header pattern compiles")
    })
}

/// A recognized, semantically valid header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub timestamp: NaiveDateTime,
    /// Everything after the closing bracket, untrimmed.
    pub rest: &'a str,
}

/// A line that has the header shape but names an impossible date or time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp `{raw}`: {reason}")]
pub struct InvalidTimestamp {
    pub raw: String,
    pub reason: &'static str,
}

/// Strip surrounding whitespace and invisible export artifacts from a raw line.
pub fn clean_line(raw: &str) -> &str {
    raw.trim().trim_start_matches(INVISIBLE_PREFIXES).trim()
}

/// Classify a cleaned line.
///
/// Returns `None` when the line does not start with a bracketed timestamp
/// (a continuation line), `Some(Err(..))` when it does but the date or time is
/// impossible, and `Some(Ok(..))` for a usable header.
pub fn match_header(line: &str) -> Option<Result<Header<'_>, InvalidTimestamp>> {
    let caps = header_regex().captures(line)?;
    let whole = caps.get(0)?;
    let rest = &line[whole.end()..];
    let raw = whole.as_str().trim_start_matches('[').trim_end_matches(']');

    Some(
        resolve_timestamp(&caps)
            .map(|timestamp| Header { timestamp, rest })
            .map_err(|reason| InvalidTimestamp {
                raw: raw.to_string(),
                reason,
            }),
    )
}

fn resolve_timestamp(caps: &Captures<'_>) -> Result<NaiveDateTime, &'static str> {
    let month = numeric_field(caps, 1)?;
    let day = numeric_field(caps, 2)?;
    let year = numeric_field(caps, 3)?;
    let hour = numeric_field(caps, 4)?;
    let minute = numeric_field(caps, 5)?;
    let second = numeric_field(caps, 6)?;
    let pm = caps.get(7).map(|m| m.as_str() == "PM").unwrap_or(false);

    if !(1..=12).contains(&hour) {
        return Err("hour out of range for a 12-hour clock");
    }
    let hour24 = hour % 12 + if pm { 12 } else { 0 };

    let date = NaiveDate::from_ymd_opt(CENTURY_BASE + year as i32, month, day)
        .ok_or("no such calendar date")?;
    let time =
        NaiveTime::from_hms_opt(hour24, minute, second).ok_or("minute or second out of range")?;
    Ok(date.and_time(time))
}

fn numeric_field(caps: &Captures<'_>, idx: usize) -> Result<u32, &'static str> {
    caps.get(idx)
        .ok_or("missing timestamp field")?
        .as_str()
        .parse()
        .map_err(|_| "non-numeric timestamp field")
}

/// Render a timestamp in canonical export form, without brackets.
///
/// Month, day and hour are unpadded; minutes and seconds are two digits.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    let (pm, hour12) = ts.hour12();
    format!(
        "{}/{}/{:02}, {}:{:02}:{:02} {}",
        ts.month(),
        ts.day(),
        ts.year().rem_euclid(100),
        hour12,
        ts.minute(),
        ts.second(),
        if pm { "PM" } else { "AM" }
    )
}
