//! ISO-8601 formatting, the inverse of [`crate::parse_datetime`].

use crate::datetime::{OffsetKind, Sign, TemporalResult};
use crate::iso8601::{IsoStyle, MAX_LENGTH};
use serde::{Deserialize, Serialize};

/// How UTC is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtcDesignator {
    /// `Z`
    #[default]
    Zulu,
    /// `+00:00` (or `+0000` in basic style)
    Offset,
}

/// Formatting choices for [`format_datetime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoFormat {
    pub style: IsoStyle,
    pub utc: UtcDesignator,
}

impl IsoFormat {
    pub fn basic() -> Self {
        Self {
            style: IsoStyle::Basic,
            ..Self::default()
        }
    }
}

/// Format a [`TemporalResult`] as a full calendar date-time.
///
/// Seconds are always written; fractional seconds only when non-zero, with
/// trailing zeros trimmed. An unspecified offset writes no suffix.
pub fn format_datetime(value: &TemporalResult, format: IsoFormat) -> String {
    let (date_sep, time_sep) = match format.style {
        IsoStyle::Extended => ("-", ":"),
        IsoStyle::Basic => ("", ""),
    };

    let mut out = String::with_capacity(MAX_LENGTH);
    out.push_str(&format!(
        "{:04}{date_sep}{:02}{date_sep}{:02}T{:02}{time_sep}{:02}{time_sep}{:02}",
        value.year, value.month, value.day, value.hour, value.minute, value.second
    ));

    if value.nanosecond > 0 {
        let fraction = format!("{:09}", value.nanosecond);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    match value.offset {
        OffsetKind::Unspecified => {}
        OffsetKind::Utc if format.utc == UtcDesignator::Zulu => out.push('Z'),
        OffsetKind::Utc => out.push_str(&format!("+00{time_sep}00")),
        OffsetKind::Fixed {
            sign,
            hours,
            minutes,
        } => {
            out.push(match sign {
                Sign::Plus => '+',
                Sign::Minus => '-',
            });
            out.push_str(&format!("{:02}{time_sep}{:02}", hours, minutes));
        }
    }

    out
}
