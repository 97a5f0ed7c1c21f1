//! The broken-down date-time produced by the ISO-8601 parser.

use crate::error::{messages, CalendarError, Result, TemporalError};
use crate::policy::UnspecifiedOffsetPolicy;
use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
    Timelike, Utc,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Plus,
    Minus,
}

/// The timezone information carried by a date-time text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OffsetKind {
    /// No suffix; resolved later by an [`UnspecifiedOffsetPolicy`]
    #[default]
    Unspecified,
    /// `Z` or `z`
    Utc,
    /// `±HH`, `±HHMM` or `±HH:MM`
    Fixed { sign: Sign, hours: u32, minutes: u32 },
}

impl OffsetKind {
    /// Signed offset in seconds, `None` when unspecified.
    pub fn seconds(&self) -> Option<i64> {
        match *self {
            OffsetKind::Unspecified => None,
            OffsetKind::Utc => Some(0),
            OffsetKind::Fixed {
                sign,
                hours,
                minutes,
            } => {
                let magnitude = i64::from(hours) * 3600 + i64::from(minutes) * 60;
                Some(match sign {
                    Sign::Plus => magnitude,
                    Sign::Minus => -magnitude,
                })
            }
        }
    }
}

/// A calendar date, wall-clock time and offset as written in the source text.
///
/// Ordinal and week dates are normalised to year/month/day during parsing, and
/// fractions of hours or minutes are carried down into the smaller units, so
/// two texts naming the same wall-clock instant compare equal.
///
/// Invariants (upheld by [`crate::parse_datetime`]):
/// - `year` is in `1..=9999`
/// - `month`/`day` name a real calendar day
/// - `hour < 24`, `minute < 60`, `second < 60`, `nanosecond < 1_000_000_000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalResult {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Fractional seconds, in nanoseconds
    pub nanosecond: u32,
    pub offset: OffsetKind,
}

impl TemporalResult {
    /// Midnight on the given date, with no offset.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: 0,
            minute: 0,
            second: 0,
            nanosecond: 0,
            offset: OffsetKind::Unspecified,
        }
    }

    /// Break a UTC instant down into fields, tagged as UTC.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let naive = instant.naive_utc();
        Self {
            year: naive.year(),
            month: naive.month(),
            day: naive.day(),
            hour: naive.hour(),
            minute: naive.minute(),
            second: naive.second(),
            nanosecond: naive.nanosecond(),
            offset: OffsetKind::Utc,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// The wall-clock date-time, ignoring the offset.
    pub fn naive(&self) -> Result<NaiveDateTime> {
        let date = self.date().ok_or_else(|| {
            TemporalError::new(messages::UNMAPPABLE).with_cause(CalendarError::NoSuchDay {
                year: self.year,
                month: self.month,
                day: self.day,
            })
        })?;
        let time =
            NaiveTime::from_hms_nano_opt(self.hour, self.minute, self.second, self.nanosecond)
                .ok_or_else(|| {
                    TemporalError::new(messages::UNMAPPABLE).with_cause(CalendarError::OutOfRange)
                })?;
        Ok(NaiveDateTime::new(date, time))
    }

    /// Resolve to a UTC instant.
    ///
    /// A fixed offset is added to the wall-clock time. Unspecified offsets are
    /// resolved by `policy`.
    pub fn to_utc(&self, policy: UnspecifiedOffsetPolicy) -> Result<DateTime<Utc>> {
        let naive = self.naive()?;
        let resolved = match self.offset.seconds() {
            Some(seconds) => naive.checked_add_signed(TimeDelta::seconds(seconds)),
            None => match policy {
                UnspecifiedOffsetPolicy::AssumeUtc => Some(naive),
                UnspecifiedOffsetPolicy::AssumeLocal => {
                    let local = Local.from_local_datetime(&naive).earliest().ok_or_else(|| {
                        TemporalError::new(messages::UNMAPPABLE).with_cause(
                            CalendarError::NonexistentLocalTime(naive.to_string()),
                        )
                    })?;
                    return Ok(local.with_timezone(&Utc));
                }
                UnspecifiedOffsetPolicy::Error => {
                    return Err(TemporalError::new(messages::UNSPECIFIED_OFFSET))
                }
            },
        };
        resolved.map(|utc| Utc.from_utc_datetime(&utc)).ok_or_else(|| {
            TemporalError::new(messages::UNMAPPABLE).with_cause(CalendarError::OutOfRange)
        })
    }
}
