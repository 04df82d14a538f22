//! xApp logger file ingest.
//!
//! Lines look like `2024-02-21 10:00:01,250 INFO normal traffic: rate ok`. The
//! remainder after the level is kept verbatim as the classifier output.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::datasource::{LOG_DOCUMENT_ID, LogDocument, LogRecord};
use crate::error::{Error, Result};
use crate::timestamp::readable_from_epoch_millis;

fn line_error(line: &str, reason: impl Into<String>) -> Error {
    Error::LogLine {
        line: line.to_string(),
        reason: reason.into(),
    }
}

/// Parse one log line into a record.
///
/// Timestamps are taken as UTC.
pub fn parse_line(line: &str) -> Result<LogRecord> {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(4, ' ');
    let (Some(date), Some(time), Some(_level), Some(class)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(line_error(line, "expected date, time, level and message"));
    };

    let (clock, fraction) = time
        .split_once(',')
        .ok_or_else(|| line_error(line, "missing ',' before milliseconds"))?;
    let millis = fraction_millis(fraction).ok_or_else(|| line_error(line, "bad milliseconds"))?;
    let parsed = NaiveDateTime::parse_from_str(&format!("{date} {clock}"), "%Y-%m-%d %H:%M:%S")
        .map_err(|err| line_error(line, err.to_string()))?;

    let epoch_millis = parsed.and_utc().timestamp_millis() + millis;
    let readable_timestamp = readable_from_epoch_millis(epoch_millis)
        .ok_or_else(|| line_error(line, "timestamp out of range"))?;
    Ok(LogRecord {
        unix_epoch: epoch_millis.div_euclid(1000),
        readable_timestamp,
        class: class.to_string(),
    })
}

/// First three fraction digits as milliseconds, right-padded with zeros.
fn fraction_millis(fraction: &str) -> Option<i64> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
    digits.parse().ok()
}

/// Read a whole log file into the document stored under [`LOG_DOCUMENT_ID`].
///
/// Blank and malformed lines are skipped.
pub fn ingest(path: &Path) -> Result<LogDocument> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    let mut skipped = 0_usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(record) => entries.push(record),
            Err(err) => {
                skipped += 1;
                warn!(line = index + 1, error = %err, "skipping log line");
            }
        }
    }
    info!(path = %path.display(), entries = entries.len(), skipped, "log file ingested");
    Ok(LogDocument {
        id: LOG_DOCUMENT_ID.to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_logger_line() {
        let record = parse_line("2024-02-21 10:00:01,250 INFO normal traffic: ok\n").unwrap();
        assert_eq!(record.readable_timestamp, "2024-02-21 10:00:01:250");
        assert_eq!(record.unix_epoch, 1_708_509_601);
        assert_eq!(record.class, "normal traffic: ok");
    }

    #[test]
    fn short_fractions_are_padded() {
        let record = parse_line("2024-02-21 10:00:01,5 INFO x").unwrap();
        assert_eq!(record.readable_timestamp, "2024-02-21 10:00:01:500");
        let record = parse_line("2024-02-21 10:00:01,123456 INFO x").unwrap();
        assert_eq!(record.readable_timestamp, "2024-02-21 10:00:01:123");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            parse_line("garbage"),
            Err(Error::LogLine { .. })
        ));
        assert!(parse_line("2024-02-21 10:00:01 INFO no millis").is_err());
        assert!(parse_line("2024-13-21 10:00:01,000 INFO bad month").is_err());
        assert!(parse_line("2024-02-21 10:00:01,abc INFO bad").is_err());
    }

    #[test]
    fn ingest_skips_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "2024-02-21 10:00:01,250 INFO jammer detected: strong").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not a log line").unwrap();
        writeln!(file, "2024-02-21 10:00:02,000 WARNING unexpected output: normal").unwrap();

        let document = ingest(file.path()).unwrap();
        assert_eq!(document.id, "log_file");
        assert_eq!(document.entries.len(), 2);
        assert_eq!(document.entries[1].class, "unexpected output: normal");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            ingest(&dir.path().join("missing.log")),
            Err(Error::Io(_))
        ));
    }
}
