//! Tests for the date format selector: ISO-8601 formatting styles, epoch
//! counts, the legacy `/Date(ms)/` form and RFC 1123.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use dynjson_temporal::{
    format_datetime, messages, parse_datetime, DateFormat, FormattedDate, IsoFormat, IsoStyle,
    OffsetKind, Sign, UnspecifiedOffsetPolicy, UtcDesignator,
};

const POLICY: UnspecifiedOffsetPolicy = UnspecifiedOffsetPolicy::AssumeUtc;

fn friday_the_13th() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2009, 2, 13, 23, 31, 30).unwrap()
}

// ---------------------------------------------------------------------------
// ISO-8601 formatting
// ---------------------------------------------------------------------------

#[test]
fn iso_extended_with_zulu() {
    let formatted = DateFormat::Iso8601.format(friday_the_13th(), IsoFormat::default());
    assert_eq!(
        formatted,
        FormattedDate::Text("2009-02-13T23:31:30Z".to_string())
    );
}

#[test]
fn iso_basic() {
    let formatted = DateFormat::Iso8601.format(friday_the_13th(), IsoFormat::basic());
    assert_eq!(formatted, FormattedDate::Text("20090213T233130Z".to_string()));
}

#[test]
fn iso_utc_as_offset() {
    let iso = IsoFormat {
        style: IsoStyle::Extended,
        utc: UtcDesignator::Offset,
    };
    let formatted = DateFormat::Iso8601.format(friday_the_13th(), iso);
    assert_eq!(
        formatted,
        FormattedDate::Text("2009-02-13T23:31:30+00:00".to_string())
    );
}

#[test]
fn iso_fraction_is_trimmed() {
    let instant = friday_the_13th() + TimeDelta::milliseconds(250);
    let formatted = DateFormat::Iso8601.format(instant, IsoFormat::default());
    assert_eq!(
        formatted,
        FormattedDate::Text("2009-02-13T23:31:30.25Z".to_string())
    );
}

#[test]
fn format_keeps_fixed_offset_and_unspecified() {
    let mut parsed = parse_datetime("2009-05-19T14:39:22-05:30").unwrap();
    assert_eq!(
        format_datetime(&parsed, IsoFormat::default()),
        "2009-05-19T14:39:22-05:30"
    );
    assert_eq!(
        format_datetime(&parsed, IsoFormat::basic()),
        "20090519T143922-0530"
    );

    parsed.offset = OffsetKind::Unspecified;
    assert_eq!(
        format_datetime(&parsed, IsoFormat::default()),
        "2009-05-19T14:39:22"
    );

    parsed.offset = OffsetKind::Fixed {
        sign: Sign::Plus,
        hours: 1,
        minutes: 0,
    };
    assert_eq!(
        format_datetime(&parsed, IsoFormat::default()),
        "2009-05-19T14:39:22+01:00"
    );
}

// ---------------------------------------------------------------------------
// Epoch formats
// ---------------------------------------------------------------------------

#[test]
fn epoch_seconds() {
    assert_eq!(
        DateFormat::EpochSeconds.parse_integer(1_234_567_890).unwrap(),
        friday_the_13th()
    );
    assert_eq!(
        DateFormat::EpochSeconds.format(friday_the_13th(), IsoFormat::default()),
        FormattedDate::Integer(1_234_567_890)
    );
}

#[test]
fn epoch_milliseconds() {
    let instant = friday_the_13th() + TimeDelta::milliseconds(123);
    assert_eq!(
        DateFormat::EpochMilliseconds
            .parse_integer(1_234_567_890_123)
            .unwrap(),
        instant
    );
    assert_eq!(
        DateFormat::EpochMilliseconds.format(instant, IsoFormat::default()),
        FormattedDate::Integer(1_234_567_890_123)
    );
}

#[test]
fn epoch_seconds_truncate_sub_second_part() {
    let instant = friday_the_13th() + TimeDelta::milliseconds(999);
    assert_eq!(
        DateFormat::EpochSeconds.format(instant, IsoFormat::default()),
        FormattedDate::Integer(1_234_567_890)
    );
}

#[test]
fn epoch_from_text() {
    assert_eq!(
        DateFormat::EpochSeconds
            .parse_text(" 1234567890 ", POLICY)
            .unwrap(),
        friday_the_13th()
    );
    let err = DateFormat::EpochSeconds
        .parse_text("12a", POLICY)
        .unwrap_err();
    assert_eq!(err.message(), messages::EPOCH_TEXT);
}

#[test]
fn epoch_out_of_range() {
    let err = DateFormat::EpochSeconds.parse_integer(i64::MAX).unwrap_err();
    assert_eq!(err.message(), messages::EPOCH_RANGE);
}

#[test]
fn integers_need_an_epoch_format() {
    for format in [DateFormat::Iso8601, DateFormat::LegacyTicks, DateFormat::Rfc1123] {
        let err = format.parse_integer(0).unwrap_err();
        assert_eq!(err.message(), messages::EPOCH_REQUIRED);
        assert!(!format.is_numeric());
    }
    assert!(DateFormat::EpochSeconds.is_numeric());
    assert!(DateFormat::EpochMilliseconds.is_numeric());
}

// ---------------------------------------------------------------------------
// Legacy ticks and RFC 1123
// ---------------------------------------------------------------------------

#[test]
fn legacy_ticks_roundtrip() {
    let formatted = DateFormat::LegacyTicks.format(friday_the_13th(), IsoFormat::default());
    assert_eq!(
        formatted,
        FormattedDate::Text("/Date(1234567890000)/".to_string())
    );
    assert_eq!(
        DateFormat::LegacyTicks
            .parse_text("/Date(1234567890000)/", POLICY)
            .unwrap(),
        friday_the_13th()
    );
}

#[test]
fn rfc1123_roundtrip() {
    let formatted = DateFormat::Rfc1123.format(friday_the_13th(), IsoFormat::default());
    assert_eq!(
        formatted,
        FormattedDate::Text("Fri, 13 Feb 2009 23:31:30 GMT".to_string())
    );
    assert_eq!(
        DateFormat::Rfc1123
            .parse_text("Fri, 13 Feb 2009 23:31:30 GMT", POLICY)
            .unwrap(),
        friday_the_13th()
    );
}

#[test]
fn rfc1123_failure_carries_cause() {
    let err = DateFormat::Rfc1123
        .parse_text("13 Smarch 2009", POLICY)
        .unwrap_err();
    assert_eq!(err.message(), messages::RFC1123_INVALID);
    assert!(err.cause().is_some());
}

#[test]
fn iso_text_through_selector() {
    assert_eq!(
        DateFormat::Iso8601
            .parse_text("2009-02-13T23:31:30Z", POLICY)
            .unwrap(),
        friday_the_13th()
    );
}

#[test]
fn date_format_deserializes_from_snake_case() {
    let format: DateFormat = serde_json::from_str("\"epoch_milliseconds\"").unwrap();
    assert_eq!(format, DateFormat::EpochMilliseconds);
    let format: DateFormat = serde_json::from_str("\"legacy_ticks\"").unwrap();
    assert_eq!(format, DateFormat::LegacyTicks);
}
