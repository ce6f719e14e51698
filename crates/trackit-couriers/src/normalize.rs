//! Checkpoint normalizer: turns provider text fragments into [`Checkpoint`]s.
//!
//! Every courier uses a fixed date format; nothing here guesses. A fragment
//! that does not match its format is an error for the caller to surface.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use thiserror::Error;
use trackit_core::Checkpoint;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Error)]
#[error("cannot parse \"{value}\" with format \"{format}\": {source}")]
pub struct TimestampError {
    pub value: String,
    pub format: &'static str,
    #[source]
    pub source: chrono::ParseError,
}

/// Trims the ends and collapses internal whitespace runs (including
/// non-breaking spaces) to a single space.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

/// Turns any whitespace into a plain space, drops control and non-ASCII
/// characters, then cleans whitespace.
///
/// Used for providers whose pages mix stray encodings into dates.
#[must_use]
pub fn strip_non_printable(raw: &str) -> String {
    let ascii: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    clean_text(&ascii)
}

/// Joins separate date and time fields with a single space.
#[must_use]
pub fn join_date_time(date: &str, time: &str) -> String {
    format!("{} {}", clean_text(date), clean_text(time))
}

/// Parses a combined date-and-time string with an exact `chrono` format.
///
/// # Errors
///
/// Returns [`TimestampError`] if `raw` does not match `format`.
pub fn parse_timestamp(raw: &str, format: &'static str) -> Result<NaiveDateTime, TimestampError> {
    let value = clean_text(raw);
    NaiveDateTime::parse_from_str(&value, format).map_err(|source| TimestampError {
        value,
        format,
        source,
    })
}

/// Parses a date-only string; the result is midnight of that day.
///
/// # Errors
///
/// Returns [`TimestampError`] if `raw` does not match `format`.
pub fn parse_date(raw: &str, format: &'static str) -> Result<NaiveDateTime, TimestampError> {
    let value = clean_text(raw);
    NaiveDate::parse_from_str(&value, format)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|source| TimestampError {
            value,
            format,
            source,
        })
}

/// Builds a checkpoint with cleaned location and status text.
#[must_use]
pub fn checkpoint(location: &str, status: &str, timestamp: NaiveDateTime) -> Checkpoint {
    Checkpoint {
        location: clean_text(location),
        status: clean_text(status),
        timestamp,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
