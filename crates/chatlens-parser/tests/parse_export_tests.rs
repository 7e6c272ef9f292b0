use chatlens_parser::{parse_chat_log, parse_chat_log_with_diagnostics, ParseError, SkipReason};
use chrono::NaiveDate;

const EXPORT: &str = "\u{feff}[3/14/24, 9:15:02 AM] Messages and calls are end-to-end encrypted.
[3/14/24, 9:15:40 AM] Dana: Morning all!
[3/14/24, 9:16:11 AM] Eli O'Brien: Train is late again: 20 minutes
[3/14/24, 9:16:11 AM] Eli O'Brien: \u{200e}<Media omitted>
[3/14/24, 9:20:00 AM] Dana: Shopping list:
- milk
- eggs

- bread
[3/14/24, 9:21:00 AM] Dana added Fern
[3/14/24, 10:02:59 PM] Fern: 😂😂 thanks for adding me
";

#[test]
fn parses_a_realistic_export() {
    let parsed = parse_chat_log_with_diagnostics(EXPORT).expect("parse");
    assert!(parsed.diagnostics.is_clean());

    let log = parsed.log;
    assert_eq!(log.len(), 7);
    assert_eq!(log.participants(), vec!["Dana", "Eli O'Brien", "Fern"]);

    assert!(log.records()[0].is_system());
    assert_eq!(
        log.records()[2].body,
        "Train is late again: 20 minutes",
        "later colons belong to the body"
    );
    assert_eq!(log.records()[3].body, "\u{200e}<Media omitted>");

    let list = &log.records()[4];
    assert_eq!(list.body, "Shopping list:\n- milk\n- eggs\n\n- bread");
    assert!(list.continuation);

    assert!(log.records()[5].is_system());
    assert_eq!(log.records()[5].body, "Dana added Fern");

    let last = &log.records()[6];
    assert_eq!(
        last.timestamp,
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(22, 2, 59)
            .unwrap()
    );
}

#[test]
fn header_then_continuation_then_header() {
    let log = parse_chat_log(
        "[1/2/24, 3:04:05 PM] Alice: hello\nworld\n[1/2/24, 3:05:00 PM] Bob: hi",
    )
    .unwrap();

    let rows: Vec<_> = log
        .iter()
        .map(|r| {
            (
                r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.sender.as_str(),
                r.body.as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("2024-01-02 15:04:05".to_string(), "Alice", "hello\nworld"),
            ("2024-01-02 15:05:00".to_string(), "Bob", "hi"),
        ]
    );
}

#[test]
fn plain_text_is_not_an_export() {
    let err = parse_chat_log("Dear diary,\ntoday nothing happened.").unwrap_err();
    assert!(matches!(err, ParseError::UnrecognizedFormat { lines: 2, .. }));
    assert!(err.to_string().contains("unrecognized chat export format"));
}

#[test]
fn day_first_exports_degrade_instead_of_failing() {
    // 25/12/23 is not a month/day date; the line is skipped, the rest survives.
    let parsed = parse_chat_log_with_diagnostics(
        "[12/24/23, 8:00:00 PM] Gus: eve\n[25/12/23, 8:00:00 AM] Gus: day\n[12/26/23, 8:00:00 AM] Gus: after",
    )
    .unwrap();
    assert_eq!(parsed.log.len(), 2);
    assert_eq!(parsed.diagnostics.skipped_count(), 1);
    match &parsed.diagnostics.skipped[0].reason {
        SkipReason::InvalidTimestamp { detail } => {
            assert!(detail.contains("25/12/23, 8:00:00 AM"), "{detail}")
        }
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn log_serializes_as_a_record_array() {
    let log = parse_chat_log("[1/2/24, 3:04:05 PM] Alice: hi").unwrap();
    let json = serde_json::to_value(&log).unwrap();
    let rows = json.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["User"], "Alice");
    assert_eq!(rows[0]["continuation"], false);
}
