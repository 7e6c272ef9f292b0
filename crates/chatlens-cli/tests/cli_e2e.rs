//! End-to-end runs of the `chatlens` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const EXPORT: &str = "\u{feff}[3/9/24, 8:58:12 AM] Dana created group \"Climbing\"\n\
[3/9/24, 9:00:00 AM] Dana: Who's in for Sunday?\n\
[3/9/24, 9:02:30 AM] Eli: me! 🧗 great idea\n\
bringing the rope\n\
[3/9/24, 9:03:00 AM] Dana: <Media omitted>\n\
[3/10/24, 6:15:00 PM] Eli: that was awesome 🎉🎉\n";

fn chatlens(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chatlens"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("CHATLENS_LOG")
        .env_remove("CHATLENS_LOG_JSON")
        .args(args)
        .output()
        .expect("run chatlens")
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("chat.txt"), EXPORT).expect("write export");
    dir
}

#[test]
fn parse_emits_json_records() {
    let dir = workspace();
    let out = chatlens(dir.path(), &["parse", "chat.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let records: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let records = records.as_array().expect("array");
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["User"], "System");
    assert_eq!(records[2]["User"], "Eli");
    assert_eq!(records[2]["Message"], "me! 🧗 great idea\nbringing the rope");
    assert_eq!(records[2]["continuation"], true);
    assert_eq!(records[2]["Datetime"], "2024-03-09T09:02:30");
}

#[test]
fn parse_writes_jsonl_file() {
    let dir = workspace();
    let out = chatlens(
        dir.path(),
        &["parse", "chat.txt", "--format", "jsonl", "--out", "out/records.jsonl"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let written = fs::read_to_string(dir.path().join("out/records.jsonl")).expect("output");
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn filter_by_person_and_topic() {
    let dir = workspace();
    let out = chatlens(
        dir.path(),
        &["filter", "chat.txt", "--person", "eli", "--topic", "AWESOME"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let records: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(records.as_array().map(Vec::len), Some(1));
    assert_eq!(records[0]["Message"], "that was awesome 🎉🎉");
}

#[test]
fn summary_reports_participants() {
    let dir = workspace();
    let out = chatlens(dir.path(), &["summary", "chat.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("5 records"), "{stdout}");
    assert!(stdout.contains("Dana, Eli"), "{stdout}");
}

#[test]
fn config_file_is_picked_up() {
    let dir = workspace();
    fs::write(
        dir.path().join("chatlens.toml"),
        "[analytics]\ntop_words = 1\n",
    )
    .expect("write config");
    let out = chatlens(dir.path(), &["words", "chat.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let rows = stdout.lines().filter(|l| l.contains('→')).count();
    assert_eq!(rows, 1, "{stdout}");
}

#[test]
fn zero_bins_fail() {
    let dir = workspace();
    let out = chatlens(dir.path(), &["responses", "chat.txt", "--bins", "0"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("at least one bin"));
}

#[test]
fn oversized_bins_fail_cleanly() {
    let dir = workspace();
    let out = chatlens(
        dir.path(),
        &["responses", "chat.txt", "--bins", "18446744073709551615"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeds the limit"));

    fs::write(
        dir.path().join("chatlens.toml"),
        "[analytics]\nhistogram_bins = 1000000000\n",
    )
    .expect("write config");
    let out = chatlens(dir.path(), &["responses", "chat.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeds the limit"));
}

#[test]
fn unrecognized_input_fails() {
    let dir = workspace();
    fs::write(dir.path().join("notes.txt"), "just some notes\nnothing else\n").expect("write");
    let out = chatlens(dir.path(), &["parse", "notes.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn invalid_utf8_fails() {
    let dir = workspace();
    fs::write(dir.path().join("bad.txt"), [0x5b, 0xff, 0xfe, 0x5d]).expect("write");
    let out = chatlens(dir.path(), &["parse", "bad.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not valid UTF-8"));
}
