//! Chat export parser
//!
//! Turns the plain-text export of a group chat into an ordered, immutable
//! [`ChatLog`] of [`MessageRecord`]s:
//!
//! ```text
//! [1/2/24, 3:04:05 PM] Alice: hello      ← header line, opens a record
//! world                                  ← continuation line, extends it
//! [1/2/24, 3:05:00 PM] Bob: hi           ← header line, next record
//! ```
//!
//! Malformed lines never abort a parse: they are dropped and listed in
//! [`ParseDiagnostics`]. The only failure is an input with no usable header
//! line at all ([`ParseError::UnrecognizedFormat`]).
//!
//! The parser keeps no state between calls; parsing the same text twice
//! yields identical results.

pub mod header;
pub mod parser;
pub mod record;

pub use header::{format_timestamp, match_header, Header, InvalidTimestamp, CENTURY_BASE};
pub use parser::{
    parse_chat_log, parse_chat_log_with_diagnostics, ParseDiagnostics, ParseError, ParsedChat,
    SkipReason, SkippedLine,
};
pub use record::{ChatLog, MessageRecord, SYSTEM_SENDER};
