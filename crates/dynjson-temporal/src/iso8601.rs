//! ISO-8601 family date-time grammar.
//!
//! Accepted shapes, in order: a date, an optional `T`/`t`/space separator, an
//! optional time, an optional timezone suffix.
//!
//! | Date form | Extended | Basic |
//! |---|---|---|
//! | year | `YYYY` | `YYYY` |
//! | calendar | `YYYY-MM`, `YYYY-MM-DD` | `YYYYMMDD` |
//! | ordinal | `YYYY-DDD` | `YYYYDDD` |
//! | week | `YYYY-Www`, `YYYY-Www-D` | `YYYYWww`, `YYYYWwwD` |
//!
//! Time is `HH[:MM[:SS]]` (extended) or `HH[MM[SS]]` (basic) with an optional
//! `,`/`.` fraction of the last unit present. The suffix is `Z`, `±HH`,
//! `±HH:MM` or `±HHMM`.
//!
//! # Style consistency
//!
//! The first component that reveals a style (a `-` in the date, a `:` in the
//! time) fixes it for the rest of the text. A year-only date or an hour-only
//! time reveals nothing and defers to whatever follows.

use crate::datetime::{OffsetKind, Sign, TemporalResult};
use crate::error::{messages, CalendarError, Result, TemporalError};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Longest accepted date-time text, in characters.
pub const MAX_LENGTH: usize = 36;

/// Basic (`20090101T1200`) or extended (`2009-01-01T12:00`) notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsoStyle {
    Basic,
    #[default]
    Extended,
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Fraction digits beyond this are below nanosecond resolution for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse an ISO-8601 family date-time into its fields.
///
/// # Errors
/// Returns a [`TemporalError`] whose message is one of the fixed strings in
/// [`messages`]. Calendar-mapping failures carry a [`CalendarError`] cause.
pub fn parse_datetime(text: &str) -> Result<TemporalResult> {
    if text.chars().count() > MAX_LENGTH {
        return Err(TemporalError::too_long(MAX_LENGTH));
    }

    let bytes = text.as_bytes();
    let date_end = bytes
        .iter()
        .position(|&b| !(b.is_ascii_digit() || b == b'-' || b == b'W'))
        .unwrap_or(bytes.len());

    let (date, mut style) = parse_date(&bytes[..date_end])?;
    let mut result = TemporalResult::from_date(date);

    let Some((&separator, time)) = bytes[date_end..].split_first() else {
        return Ok(result);
    };
    if !matches!(separator, b'T' | b't' | b' ') {
        return Err(TemporalError::new(messages::UNEXPECTED_SEPARATOR));
    }

    let mut cursor = Cursor { bytes: time, pos: 0 };
    parse_time(&mut cursor, &mut style, &mut result)?;
    result.offset = parse_offset(&mut cursor, style)?;
    Ok(result)
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

fn parse_date(bytes: &[u8]) -> Result<(NaiveDate, Option<IsoStyle>)> {
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return Err(TemporalError::new(messages::YEAR_START));
    }
    let year = digits(&bytes[..4])? as i32;
    if year == 0 {
        return Err(TemporalError::new(messages::YEAR_ZERO));
    }

    let rest = &bytes[4..];
    let style = match rest.first() {
        None => None,
        Some(b'-') => Some(IsoStyle::Extended),
        Some(_) => Some(IsoStyle::Basic),
    };

    let date = match (rest.len(), rest) {
        (0, _) => calendar_date(year, 1, 1)?,
        // YYYY-MM
        (3, [b'-', month @ ..]) => calendar_date(year, digits(month)?, 1)?,
        // YYYYWww
        (3, [b'W', week @ ..]) => week_date(year, week_number(week)?, None)?,
        // YYYYDDD
        (3, ordinal) => ordinal_date(year, digits(ordinal)?)?,
        // YYYY-Www
        (4, [b'-', b'W', week @ ..]) => week_date(year, week_number(week)?, None)?,
        // YYYY-DDD
        (4, [b'-', ordinal @ ..]) => ordinal_date(year, digits(ordinal)?)?,
        // YYYYWwwD
        (4, [b'W', w1, w2, day]) => {
            week_date(year, week_number(&[*w1, *w2])?, Some(*day))?
        }
        // YYYYMMDD
        (4, [m1, m2, d1, d2]) => {
            calendar_date(year, digits(&[*m1, *m2])?, digits(&[*d1, *d2])?)?
        }
        // YYYY-Www-D
        (6, [b'-', b'W', w1, w2, sep, day]) => {
            let week = week_number(&[*w1, *w2])?;
            expect_separator(*sep)?;
            week_date(year, week, Some(*day))?
        }
        // YYYY-MM-DD
        (6, [sep1, m1, m2, sep2, d1, d2]) => {
            expect_separator(*sep1)?;
            expect_separator(*sep2)?;
            calendar_date(year, digits(&[*m1, *m2])?, digits(&[*d1, *d2])?)?
        }
        _ => return Err(TemporalError::new(messages::DATE_LENGTH)),
    };

    Ok((date, style))
}

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(TemporalError::new(messages::MONTH_RANGE));
    }
    if !(1..=31).contains(&day) {
        return Err(TemporalError::new(messages::DAY_RANGE));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        TemporalError::new(messages::UNMAPPABLE)
            .with_cause(CalendarError::NoSuchDay { year, month, day })
    })
}

fn ordinal_date(year: i32, ordinal: u32) -> Result<NaiveDate> {
    if !(1..=366).contains(&ordinal) {
        return Err(TemporalError::new(messages::ORDINAL_RANGE));
    }
    if ordinal == 366 && !is_leap_year(year) {
        return Err(TemporalError::new(messages::ORDINAL_LEAP));
    }
    NaiveDate::from_yo_opt(year, ordinal).ok_or_else(|| {
        TemporalError::new(messages::UNMAPPABLE)
            .with_cause(CalendarError::NoSuchOrdinal { year, ordinal })
    })
}

fn week_number(bytes: &[u8]) -> Result<u32> {
    let week = digits(bytes)?;
    if !(1..=53).contains(&week) {
        return Err(TemporalError::new(messages::WEEK_RANGE));
    }
    Ok(week)
}

/// Week 1 is the week containing the year's first Thursday; days run Monday (1)
/// to Sunday (7), and a missing weekday means Monday. A week-53 date in a
/// 52-week year fails to map.
fn week_date(year: i32, week: u32, day: Option<u8>) -> Result<NaiveDate> {
    let weekday = day.map_or(Ok(1), weekday)?;
    let day = WEEKDAYS[(weekday - 1) as usize];
    NaiveDate::from_isoywd_opt(year, week, day).ok_or_else(|| {
        TemporalError::new(messages::UNMAPPABLE).with_cause(CalendarError::NoSuchWeek {
            year,
            week,
            weekday,
        })
    })
}

fn weekday(byte: u8) -> Result<u32> {
    match byte {
        b'1'..=b'7' => Ok(u32::from(byte - b'0')),
        _ => Err(TemporalError::new(messages::WEEKDAY_RANGE)),
    }
}

fn expect_separator(byte: u8) -> Result<()> {
    match byte {
        b'-' => Ok(()),
        _ => Err(TemporalError::new(messages::DATE_SEPARATOR)),
    }
}

fn digits(bytes: &[u8]) -> Result<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(TemporalError::new(messages::EXPECTED_DIGIT))
        }
    })
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

// ---------------------------------------------------------------------------
// Time and offset
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn digit(&mut self) -> Option<u32> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {
                self.bump();
                Some(u32::from(b - b'0'))
            }
            _ => None,
        }
    }

    /// Two digits; `missing` when the first is absent, "Expected digit" when
    /// only the second is.
    fn two_digits(&mut self, missing: &'static str) -> Result<u32> {
        let tens = self.digit().ok_or_else(|| TemporalError::new(missing))?;
        let ones = self
            .digit()
            .ok_or_else(|| TemporalError::new(messages::EXPECTED_DIGIT))?;
        Ok(tens * 10 + ones)
    }
}

/// Whether another `HH`/`MM`/`SS` component follows, consuming a `:` if present
/// and enforcing the established style.
fn next_component(
    cursor: &mut Cursor<'_>,
    style: &mut Option<IsoStyle>,
    mixed: &'static str,
) -> Result<bool> {
    match cursor.peek() {
        Some(b':') => {
            if *style == Some(IsoStyle::Basic) {
                return Err(TemporalError::new(mixed));
            }
            *style = Some(IsoStyle::Extended);
            cursor.bump();
            Ok(true)
        }
        Some(b) if b.is_ascii_digit() => {
            if *style == Some(IsoStyle::Extended) {
                return Err(TemporalError::new(mixed));
            }
            *style = Some(IsoStyle::Basic);
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Unit {
    Hour,
    Minute,
    Second,
}

fn parse_time(
    cursor: &mut Cursor<'_>,
    style: &mut Option<IsoStyle>,
    result: &mut TemporalResult,
) -> Result<()> {
    let (Some(tens), Some(ones)) = (cursor.digit(), cursor.digit()) else {
        return Err(TemporalError::new(messages::TIME_HOUR));
    };
    let hour = tens * 10 + ones;
    if hour > 23 {
        return Err(TemporalError::new(messages::HOUR_RANGE));
    }

    let mut unit = Unit::Hour;
    let mut minute = 0;
    let mut second = 0;

    if next_component(cursor, style, messages::TIME_SEPARATOR)? {
        minute = cursor.two_digits(messages::TIME_MINUTE)?;
        if minute > 59 {
            return Err(TemporalError::new(messages::MINUTE_RANGE));
        }
        unit = Unit::Minute;

        if next_component(cursor, style, messages::TIME_SEPARATOR)? {
            second = cursor.two_digits(messages::TIME_SECOND)?;
            if second > 59 {
                return Err(TemporalError::new(messages::SECOND_RANGE));
            }
            unit = Unit::Second;
        }
    }

    let mut nanosecond = 0;
    if matches!(cursor.peek(), Some(b',' | b'.')) {
        cursor.bump();
        let extra = fraction_nanos(cursor, unit)?;
        let extra_seconds = (extra / NANOS_PER_SECOND) as u32;
        nanosecond = (extra % NANOS_PER_SECOND) as u32;
        match unit {
            Unit::Hour => {
                minute = extra_seconds / 60;
                second = extra_seconds % 60;
            }
            Unit::Minute => second = extra_seconds,
            Unit::Second => {}
        }
    }

    result.hour = hour;
    result.minute = minute;
    result.second = second;
    result.nanosecond = nanosecond;
    Ok(())
}

/// Read fraction digits and scale them to nanoseconds of `unit`.
fn fraction_nanos(cursor: &mut Cursor<'_>, unit: Unit) -> Result<u128> {
    let start = cursor.pos;
    while cursor.digit().is_some() {}
    let fraction = &cursor.bytes[start..cursor.pos];
    if fraction.is_empty() {
        return Err(TemporalError::new(messages::EXPECTED_DIGIT));
    }

    let significant = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    let numerator = significant
        .iter()
        .fold(0u128, |acc, &b| acc * 10 + u128::from(b - b'0'));
    let denominator = 10u128.pow(significant.len() as u32);
    let scale = match unit {
        Unit::Hour => NANOS_PER_HOUR,
        Unit::Minute => NANOS_PER_MINUTE,
        Unit::Second => NANOS_PER_SECOND,
    };
    Ok(numerator * scale / denominator)
}

fn parse_offset(cursor: &mut Cursor<'_>, style: Option<IsoStyle>) -> Result<OffsetKind> {
    let offset = match cursor.peek() {
        None => return Ok(OffsetKind::Unspecified),
        Some(b'Z' | b'z') => {
            cursor.bump();
            OffsetKind::Utc
        }
        Some(sign @ (b'+' | b'-')) => {
            cursor.bump();
            let sign = if sign == b'+' { Sign::Plus } else { Sign::Minus };
            let hours = cursor.two_digits(messages::OFFSET_HOUR)?;
            if hours > 23 {
                return Err(TemporalError::new(messages::OFFSET_HOUR_RANGE));
            }
            let minutes = match cursor.peek() {
                Some(b':') => {
                    if style == Some(IsoStyle::Basic) {
                        return Err(TemporalError::new(messages::OFFSET_SEPARATOR));
                    }
                    cursor.bump();
                    cursor.two_digits(messages::EXPECTED_DIGIT)?
                }
                Some(b) if b.is_ascii_digit() => {
                    if style == Some(IsoStyle::Extended) {
                        return Err(TemporalError::new(messages::OFFSET_SEPARATOR));
                    }
                    cursor.two_digits(messages::EXPECTED_DIGIT)?
                }
                _ => 0,
            };
            if minutes > 59 {
                return Err(TemporalError::new(messages::OFFSET_MINUTE_RANGE));
            }
            OffsetKind::Fixed {
                sign,
                hours,
                minutes,
            }
        }
        Some(_) => return Err(TemporalError::new(messages::TIME_TRAILING)),
    };

    if !cursor.is_done() {
        return Err(TemporalError::new(messages::OFFSET_TRAILING));
    }
    Ok(offset)
}
