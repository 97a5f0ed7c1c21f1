//! Error types for date/time parsing and formatting.
//!
//! Every failure carries one of the fixed diagnostic strings in [`messages`].
//! Callers match on that text, so it must never change.

use thiserror::Error;

/// Fixed diagnostic strings. Callers compare against these verbatim.
pub mod messages {
    pub const YEAR_START: &str = "ISO8601 date must begin with a 4 character year";
    pub const YEAR_ZERO: &str = "ISO8601 year 0000 cannot be converted to a DateTime";
    pub const MONTH_RANGE: &str = "Expected month to be between 01 and 12";
    pub const DAY_RANGE: &str = "Expected day to be between 01 and 31";
    pub const ORDINAL_RANGE: &str = "Expected ordinal day to be between 001 and 366";
    pub const ORDINAL_LEAP: &str = "Ordinal day can only be 366 in a leap year";
    pub const WEEK_RANGE: &str = "Expected week to be between 01 and 53";
    pub const WEEKDAY_RANGE: &str = "Expected day to be a digit between 1 and 7";
    pub const UNMAPPABLE: &str = "ISO8601 date could not be mapped to DateTime";
    pub const DATE_LENGTH: &str = "Unexpected date string length";
    pub const EXPECTED_DIGIT: &str = "Expected digit";
    pub const DATE_SEPARATOR: &str = "Expected '-' in ISO8601 date";
    pub const UNEXPECTED_SEPARATOR: &str = "Unexpected separator";
    pub const TIME_SEPARATOR: &str = "Unexpected separator in ISO8601 time";
    pub const OFFSET_SEPARATOR: &str = "Unexpected separator in ISO8601 timezone offset";
    pub const TIME_HOUR: &str = "ISO8601 time must begin with a 2 character hour";
    pub const TIME_MINUTE: &str = "Expected minute part of ISO8601 time";
    pub const TIME_SECOND: &str = "Expected second part of ISO8601 time";
    pub const HOUR_RANGE: &str = "Expected hour to be between 00 and 23";
    pub const MINUTE_RANGE: &str = "Expected minute to be between 00 and 59";
    pub const SECOND_RANGE: &str = "Expected second to be between 00 and 59";
    pub const TIME_TRAILING: &str = "Unexpected character in ISO8601 time";
    pub const OFFSET_HOUR: &str = "Expected hour part of ISO8601 timezone offset";
    pub const OFFSET_HOUR_RANGE: &str = "Expected timezone offset hour to be between 00 and 23";
    pub const OFFSET_MINUTE_RANGE: &str =
        "Expected timezone offset minute to be between 00 and 59";
    pub const OFFSET_TRAILING: &str = "Unexpected character after ISO8601 timezone offset";
    pub const UNSPECIFIED_OFFSET: &str = "ISO8601 date did not specify a timezone offset";
    pub const EPOCH_RANGE: &str = "Epoch time is outside the representable DateTime range";
    pub const EPOCH_TEXT: &str = "Expected an integer count of time since the Unix epoch";
    pub const EPOCH_REQUIRED: &str = "Numeric date values require an epoch date format";
    pub const LEGACY_PREFIX: &str = "Expected /Date( at the start of a legacy date";
    pub const LEGACY_SUFFIX: &str = "Expected )/ at the end of a legacy date";
    pub const RFC1123_INVALID: &str = "Could not parse RFC1123 date";
}

/// A date/time text could not be parsed or mapped onto the calendar.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TemporalError {
    message: String,
    #[source]
    cause: Option<CalendarError>,
}

impl TemporalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the calendar-level failure that produced this error.
    pub fn with_cause(mut self, cause: CalendarError) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&CalendarError> {
        self.cause.as_ref()
    }

    pub(crate) fn too_long(max: usize) -> Self {
        Self::new(format!(
            "ISO8601 date is too long, expected {} characters or less",
            max
        ))
    }
}

/// Calendar-level reasons a syntactically valid date cannot become an instant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("{year:04}-{month:02} has no day {day:02}")]
    NoSuchDay { year: i32, month: u32, day: u32 },

    #[error("{year:04} has no ordinal day {ordinal:03}")]
    NoSuchOrdinal { year: i32, ordinal: u32 },

    #[error("{year:04} has no ISO week {week:02} day {weekday}")]
    NoSuchWeek { year: i32, week: u32, weekday: u32 },

    #[error("local time {0} does not exist in the system time zone")]
    NonexistentLocalTime(String),

    #[error("date-time is outside the representable range")]
    OutOfRange,

    #[error(transparent)]
    Rfc1123(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, TemporalError>;
