//! Parser for `git log` author output.
//!
//! [`CommitLogReader`] turns the NUL-delimited `%an%x00%ae` log format into
//! a lazy sequence of [`CommitRecord`]s.

use tracing::{debug, warn};

use crate::errors::AuditError;
use crate::models::CommitRecord;

/// Placeholder substituted when a commit carries an empty author name.
pub const UNNAMED_AUTHOR: &str = "(no name)";

/// Lazy, non-restartable reader over raw `git log --format=%an%x00%ae`
/// output.
///
/// Yields one [`CommitRecord`] per decodable line, newest commit first.
/// Blank lines are skipped, not fatal to the scan.
pub struct CommitLogReader<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> CommitLogReader<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { lines: raw.lines() }
    }
}

impl Iterator for CommitLogReader<'_> {
    type Item = CommitRecord;

    fn next(&mut self) -> Option<CommitRecord> {
        loop {
            let line = self.lines.next()?;
            if let Some(record) = parse_line(line) {
                return Some(record);
            }
            warn!("skipping blank commit log line");
        }
    }
}

/// Decode one `NAME<NUL>EMAIL` line.
///
/// Lines without a NUL separator still decode as a name-only record (older
/// tooling emits them for commits with no email configured). Only blank
/// lines are rejected.
fn parse_line(line: &str) -> Option<CommitRecord> {
    if line.trim().is_empty() {
        return None;
    }
    let (name, email) = match line.split_once('\0') {
        Some((name, email)) => (name, email),
        None => (line, ""),
    };
    let name = name.trim();
    let email = email.trim();
    Some(CommitRecord {
        author_name: if name.is_empty() {
            UNNAMED_AUTHOR.to_string()
        } else {
            name.to_string()
        },
        author_email: if email.is_empty() {
            None
        } else {
            Some(email.to_string())
        },
    })
}

/// Decode an entire log stream.
///
/// Fails only when the stream carries data but zero records decode from it;
/// empty input is a valid empty history.
pub fn decode_log(raw: &str) -> Result<Vec<CommitRecord>, AuditError> {
    let records: Vec<CommitRecord> = CommitLogReader::new(raw).collect();
    if records.is_empty() && !raw.trim().is_empty() {
        return Err(AuditError::LogUnparseable { bytes: raw.len() });
    }
    debug!(count = records.len(), "decoded commit log");
    Ok(records)
}
