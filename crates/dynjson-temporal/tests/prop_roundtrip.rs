//! Property-based tests for the ISO-8601 grammar.
//!
//! - `parse_datetime(format_datetime(x)) == x` in both notations
//! - ordinal and week-date spellings of any day parse back to that day
//! - every UTC instant survives each date format

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use dynjson_temporal::{
    format_datetime, parse_datetime, DateFormat, FormattedDate, IsoFormat, IsoStyle, OffsetKind,
    Sign, TemporalResult, UnspecifiedOffsetPolicy, UtcDesignator,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_offset() -> impl Strategy<Value = OffsetKind> {
    prop_oneof![
        Just(OffsetKind::Unspecified),
        Just(OffsetKind::Utc),
        (any::<bool>(), 0u32..=23, 0u32..=59).prop_map(|(plus, hours, minutes)| {
            OffsetKind::Fixed {
                sign: if plus { Sign::Plus } else { Sign::Minus },
                hours,
                minutes,
            }
        }),
    ]
}

/// Days capped at 28 so every month is valid.
fn arb_temporal() -> impl Strategy<Value = TemporalResult> {
    (
        (1i32..=9999, 1u32..=12, 1u32..=28),
        (0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000_000),
        arb_offset(),
    )
        .prop_map(
            |((year, month, day), (hour, minute, second, nanosecond), offset)| TemporalResult {
                year,
                month,
                day,
                hour,
                minute,
                second,
                nanosecond,
                offset,
            },
        )
}

fn arb_style() -> impl Strategy<Value = IsoStyle> {
    prop_oneof![Just(IsoStyle::Basic), Just(IsoStyle::Extended)]
}

/// Any day whose ISO week-year is also a four digit year.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2i32..=9998, 1u32..=366).prop_filter_map("ordinal must exist", |(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
    })
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 0001-01-01 .. 9999-12-31 in milliseconds
    (-62_135_596_800_000i64..253_402_300_799_000i64).prop_map(|ms| {
        DateTime::from_timestamp_millis(ms).expect("range is representable")
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn format_then_parse_is_identity(value in arb_temporal(), style in arb_style()) {
        let format = IsoFormat { style, utc: UtcDesignator::Zulu };
        let text = format_datetime(&value, format);
        let parsed = parse_datetime(&text).expect("formatted text must parse");
        prop_assert_eq!(parsed, value, "text: {}", text);
    }

    #[test]
    fn ordinal_spelling_names_same_day(date in arb_date()) {
        let extended = format!("{:04}-{:03}", date.year(), date.ordinal());
        let basic = format!("{:04}{:03}", date.year(), date.ordinal());
        prop_assert_eq!(parse_datetime(&extended).unwrap().date(), Some(date));
        prop_assert_eq!(parse_datetime(&basic).unwrap().date(), Some(date));
    }

    #[test]
    fn week_spelling_names_same_day(date in arb_date()) {
        let week = date.iso_week();
        let weekday = date.weekday().number_from_monday();
        let extended = format!("{:04}-W{:02}-{}", week.year(), week.week(), weekday);
        let basic = format!("{:04}W{:02}{}", week.year(), week.week(), weekday);
        prop_assert_eq!(parse_datetime(&extended).unwrap().date(), Some(date));
        prop_assert_eq!(parse_datetime(&basic).unwrap().date(), Some(date));
    }

    #[test]
    fn instants_survive_every_text_format(instant in arb_instant()) {
        let policy = UnspecifiedOffsetPolicy::Error;
        for format in [DateFormat::Iso8601, DateFormat::LegacyTicks, DateFormat::EpochMilliseconds] {
            let back = match format.format(instant, IsoFormat::default()) {
                FormattedDate::Text(text) => format.parse_text(&text, policy).unwrap(),
                FormattedDate::Integer(count) => format.parse_integer(count).unwrap(),
            };
            prop_assert_eq!(back, instant);
        }
    }

    #[test]
    fn epoch_seconds_round_down(instant in arb_instant()) {
        let FormattedDate::Integer(seconds) =
            DateFormat::EpochSeconds.format(instant, IsoFormat::default())
        else {
            panic!("epoch seconds must be numeric");
        };
        let back = DateFormat::EpochSeconds.parse_integer(seconds).unwrap();
        prop_assert!(back <= instant);
        prop_assert!(instant - back < TimeDelta::seconds(1));
    }
}
