//! Time-of-day timestamps used as series keys.
//!
//! Recorded samples carry a readable `YYYY-MM-DD HH:MM:SS:mmm` string. Only the
//! time part is kept, converted to milliseconds since the start of the day.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Convert `HH:MM:SS:mmm` into milliseconds since start of day.
pub fn timestamp_to_millis(text: &str) -> Result<i64> {
    let mut fields = [0_i64; 4];
    let mut parts = text.split(':');
    for field in &mut fields {
        let part = parts
            .next()
            .ok_or_else(|| Error::timestamp(text, "expected four fields"))?;
        *field = part
            .trim()
            .parse::<u32>()
            .map_err(|err| Error::timestamp(text, err.to_string()))? as i64;
    }
    if parts.next().is_some() {
        return Err(Error::timestamp(text, "expected four fields"));
    }
    let [hours, minutes, seconds, millis] = fields;
    Ok((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

/// Return the time part of a readable `date time` timestamp.
pub fn time_part(readable: &str) -> Result<&str> {
    readable
        .split(' ')
        .nth(1)
        .filter(|part| !part.is_empty())
        .ok_or_else(|| Error::timestamp(readable, "missing time part"))
}

/// Parse the time part of a readable timestamp into day milliseconds.
pub fn readable_to_millis(readable: &str) -> Result<i64> {
    timestamp_to_millis(time_part(readable)?)
}

/// Format day milliseconds as `HH:MM:SS:mmm`.
///
/// Used as the x-axis label formatter of the KPI charts.
pub fn format_millis(millis: i64) -> String {
    let millis = millis.max(0);
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let rest = millis % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{rest:03}")
}

/// Format epoch milliseconds as a UTC `YYYY-MM-DD HH:MM:SS:mmm` string.
pub fn readable_from_epoch_millis(epoch_millis: i64) -> Option<String> {
    let datetime: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_millis)?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S:%3f").to_string())
}
