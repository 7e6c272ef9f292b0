//! Line-classification state machine.
//!
//! Every physical line is classified once:
//!
//! - blank: ignored, but remembered as a paragraph break if more body text
//!   for the open message follows;
//! - header with a valid timestamp: closes the open message, opens a new one;
//! - header with an impossible timestamp: closes the open message and is
//!   skipped;
//! - anything else: a continuation of the open message, or skipped when no
//!   message is open.
//!
//! Skipped lines are recorded in [`ParseDiagnostics`]; the only fatal outcome
//! is a log with no records at all.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::header::{clean_line, match_header, Header};
use crate::record::{ChatLog, MessageRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(
        "unrecognized chat export format: no timestamped header line in {lines} line(s) ({skipped} skipped)"
    )]
    UnrecognizedFormat { lines: usize, skipped: usize },
}

/// Why a non-blank line did not end up in any record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Body text before the first usable header line.
    OrphanContinuation,
    /// Header-shaped line whose date or time does not exist.
    InvalidTimestamp { detail: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::OrphanContinuation => write!(f, "continuation line with no open message"),
            SkipReason::InvalidTimestamp { detail } => write!(f, "{detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based physical line number.
    pub line_no: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Physical lines read, blank ones included.
    pub lines_scanned: usize,
    /// Header lines that opened a record.
    pub headers: usize,
    pub skipped: Vec<SkippedLine>,
}

impl ParseDiagnostics {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A parsed log together with the lines that were dropped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChat {
    pub log: ChatLog,
    pub diagnostics: ParseDiagnostics,
}

/// Parse the full text of a chat export.
pub fn parse_chat_log(text: &str) -> Result<ChatLog, ParseError> {
    parse_chat_log_with_diagnostics(text).map(|parsed| parsed.log)
}

/// Parse the full text of a chat export and report every skipped line.
pub fn parse_chat_log_with_diagnostics(text: &str) -> Result<ParsedChat, ParseError> {
    let mut machine = LineMachine::default();
    for (idx, raw) in text.lines().enumerate() {
        machine.feed(idx + 1, raw);
    }
    machine.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    AwaitingHeader,
    InMessage,
}

#[derive(Debug, Default)]
struct LineMachine {
    state: State,
    records: Vec<MessageRecord>,
    /// Blank lines seen since the open message last grew.
    pending_blanks: usize,
    diagnostics: ParseDiagnostics,
}

impl LineMachine {
    fn feed(&mut self, line_no: usize, raw: &str) {
        self.diagnostics.lines_scanned += 1;

        let line = clean_line(raw);
        if line.is_empty() {
            if self.state == State::InMessage {
                self.pending_blanks += 1;
            }
            return;
        }

        match match_header(line) {
            Some(Ok(header)) => self.open(header),
            Some(Err(invalid)) => {
                // The rejected message's own continuation lines must not be
                // glued onto the previous sender's record.
                self.close();
                self.skip(
                    line_no,
                    SkipReason::InvalidTimestamp {
                        detail: invalid.to_string(),
                    },
                );
            }
            None => self.extend(line_no, line),
        }
    }

    fn open(&mut self, header: Header<'_>) {
        self.records
            .push(MessageRecord::from_header(header.timestamp, header.rest));
        self.diagnostics.headers += 1;
        self.pending_blanks = 0;
        self.state = State::InMessage;
    }

    fn close(&mut self) {
        self.pending_blanks = 0;
        self.state = State::AwaitingHeader;
    }

    fn extend(&mut self, line_no: usize, line: &str) {
        if self.state != State::InMessage {
            self.skip(line_no, SkipReason::OrphanContinuation);
            return;
        }
        let breaks = self.pending_blanks + 1;
        let Some(record) = self.records.last_mut() else {
            self.skip(line_no, SkipReason::OrphanContinuation);
            return;
        };

        // The separator is kept even after an empty header body so the
        // record re-exports with the text on its own line.
        for _ in 0..breaks {
            record.body.push('\n');
        }
        record.body.push_str(line);
        record.continuation = true;
        self.pending_blanks = 0;
    }

    fn skip(&mut self, line_no: usize, reason: SkipReason) {
        debug!(line = line_no, reason = %reason, "skipping chat line");
        self.diagnostics.skipped.push(SkippedLine { line_no, reason });
    }

    fn finish(mut self) -> Result<ParsedChat, ParseError> {
        self.close();
        let diagnostics = self.diagnostics;

        if self.records.is_empty() {
            return Err(ParseError::UnrecognizedFormat {
                lines: diagnostics.lines_scanned,
                skipped: diagnostics.skipped_count(),
            });
        }

        if !diagnostics.is_clean() {
            warn!(
                skipped = diagnostics.skipped_count(),
                "chat log lines skipped while parsing"
            );
        }
        debug!(
            records = self.records.len(),
            lines = diagnostics.lines_scanned,
            "parsed chat log"
        );

        Ok(ParsedChat {
            log: ChatLog::from_records(self.records),
            diagnostics,
        })
    }
}
