//! Date format selection: ISO-8601 text, Unix epoch counts, the legacy
//! `/Date(ms)/` style and RFC 1123 HTTP dates.
//!
//! Only ISO-8601 goes through the full grammar in [`crate::iso8601`]. The other
//! formats share nothing with it except the resulting UTC instant.

use crate::datetime::TemporalResult;
use crate::error::{messages, Result, TemporalError};
use crate::format::{format_datetime, IsoFormat};
use crate::iso8601::parse_datetime;
use crate::policy::UnspecifiedOffsetPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `2009-02-15T00:00:00Z`
    #[default]
    Iso8601,
    /// Integer seconds since 1970-01-01T00:00:00Z
    EpochSeconds,
    /// Integer milliseconds since 1970-01-01T00:00:00Z
    EpochMilliseconds,
    /// `/Date(1234567890000)/`, milliseconds since the epoch
    LegacyTicks,
    /// `Sun, 15 Feb 2009 00:00:00 GMT`
    Rfc1123,
}

/// A formatted date: epoch formats produce JSON numbers, the rest strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedDate {
    Text(String),
    Integer(i64),
}

impl DateFormat {
    /// Whether this format writes dates as JSON numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, DateFormat::EpochSeconds | DateFormat::EpochMilliseconds)
    }

    /// Parse date text under this format.
    ///
    /// Epoch formats accept the decimal count as text, surrounded by optional
    /// ASCII spaces.
    pub fn parse_text(self, text: &str, policy: UnspecifiedOffsetPolicy) -> Result<DateTime<Utc>> {
        match self {
            DateFormat::Iso8601 => parse_datetime(text)?.to_utc(policy),
            DateFormat::EpochSeconds | DateFormat::EpochMilliseconds => {
                let count: i64 = text
                    .trim_matches(' ')
                    .parse()
                    .map_err(|_| TemporalError::new(messages::EPOCH_TEXT))?;
                self.parse_integer(count)
            }
            DateFormat::LegacyTicks => parse_legacy_ticks(text),
            DateFormat::Rfc1123 => parse_rfc1123(text),
        }
    }

    /// Interpret an integer under an epoch format.
    pub fn parse_integer(self, count: i64) -> Result<DateTime<Utc>> {
        let instant = match self {
            DateFormat::EpochSeconds => DateTime::from_timestamp(count, 0),
            DateFormat::EpochMilliseconds => DateTime::from_timestamp_millis(count),
            _ => return Err(TemporalError::new(messages::EPOCH_REQUIRED)),
        };
        instant.ok_or_else(|| TemporalError::new(messages::EPOCH_RANGE))
    }

    /// Format an instant. Epoch formats truncate toward the earlier whole unit.
    pub fn format(self, instant: DateTime<Utc>, iso: IsoFormat) -> FormattedDate {
        match self {
            DateFormat::Iso8601 => {
                FormattedDate::Text(format_datetime(&TemporalResult::from_utc(instant), iso))
            }
            DateFormat::EpochSeconds => FormattedDate::Integer(instant.timestamp()),
            DateFormat::EpochMilliseconds => FormattedDate::Integer(instant.timestamp_millis()),
            DateFormat::LegacyTicks => {
                FormattedDate::Text(format!("/Date({})/", instant.timestamp_millis()))
            }
            DateFormat::Rfc1123 => FormattedDate::Text(
                instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            ),
        }
    }
}

/// Parse `/Date(ms)/` or `/Date(ms±HHMM)/`.
///
/// The milliseconds are already UTC; the optional offset only records the
/// writer's zone and does not move the instant.
fn parse_legacy_ticks(text: &str) -> Result<DateTime<Utc>> {
    let inner = text
        .strip_prefix("/Date(")
        .ok_or_else(|| TemporalError::new(messages::LEGACY_PREFIX))?
        .strip_suffix(")/")
        .ok_or_else(|| TemporalError::new(messages::LEGACY_SUFFIX))?;

    let sign_len = usize::from(inner.starts_with('-'));
    let digit_count = inner[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digit_count == 0 {
        return Err(TemporalError::new(messages::EXPECTED_DIGIT));
    }
    let (ticks, suffix) = inner.split_at(sign_len + digit_count);

    let valid_suffix = suffix.is_empty()
        || (suffix.len() == 5
            && matches!(suffix.as_bytes()[0], b'+' | b'-')
            && suffix.as_bytes()[1..].iter().all(u8::is_ascii_digit));
    if !valid_suffix {
        return Err(TemporalError::new(messages::EXPECTED_DIGIT));
    }

    let millis: i64 = ticks
        .parse()
        .map_err(|_| TemporalError::new(messages::EPOCH_RANGE))?;
    DateFormat::EpochMilliseconds.parse_integer(millis)
}

fn parse_rfc1123(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(text)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| TemporalError::new(messages::RFC1123_INVALID).with_cause(e.into()))
}
