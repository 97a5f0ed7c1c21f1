use chrono::{DateTime, TimeZone, Utc};
use dynjson_core::{parse_str, to_json, write_value, FormatOptions, Value};
use dynjson_temporal::{parse_datetime, DateFormat, IsoFormat, UtcDesignator};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

fn friday_the_13th() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2009, 2, 13, 23, 31, 30).unwrap()
}

fn dated(format: DateFormat) -> FormatOptions {
    FormatOptions::default().with_date_format(format)
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn dates_follow_the_configured_format() {
    let at = friday_the_13th();
    let cases = [
        (DateFormat::Iso8601, r#""2009-02-13T23:31:30Z""#),
        (DateFormat::EpochSeconds, "1234567890"),
        (DateFormat::EpochMilliseconds, "1234567890000"),
        (DateFormat::LegacyTicks, r#""/Date(1234567890000)/""#),
        (DateFormat::Rfc1123, r#""Fri, 13 Feb 2009 23:31:30 GMT""#),
    ];
    for (format, expected) in cases {
        assert_eq!(to_json(&at, &dated(format)).unwrap(), expected, "{format:?}");
    }
}

#[test]
fn iso_format_options_apply_to_dates() {
    let at = friday_the_13th();
    let basic = FormatOptions::default().with_iso_format(IsoFormat::basic());
    assert_eq!(to_json(&at, &basic).unwrap(), r#""20090213T233130Z""#);

    let offset = FormatOptions::default().with_iso_format(IsoFormat {
        utc: UtcDesignator::Offset,
        ..IsoFormat::default()
    });
    assert_eq!(
        to_json(&at, &offset).unwrap(),
        r#""2009-02-13T23:31:30+00:00""#
    );
}

#[test]
fn temporal_result_keeps_its_offset() {
    let parsed = parse_datetime("2009-02-13T23:31:30.250-05:00").unwrap();
    assert_eq!(
        to_json(&parsed, &dated(DateFormat::EpochSeconds)).unwrap(),
        r#""2009-02-13T23:31:30.25-05:00""#
    );
}

#[test]
fn written_dates_read_back() {
    for format in [
        DateFormat::Iso8601,
        DateFormat::EpochSeconds,
        DateFormat::EpochMilliseconds,
        DateFormat::LegacyTicks,
        DateFormat::Rfc1123,
    ] {
        let options = dated(format);
        let text = to_json(&friday_the_13th(), &options).unwrap();
        let doc = dynjson_core::deserialize_dynamic(&text, options).unwrap();
        let back: DateTime<Utc> = doc.root().cast().unwrap();
        assert_eq!(back, friday_the_13th(), "{format:?}");
    }
}

// ============================================================================
// Scalars and collections
// ============================================================================

#[test]
fn scalars() {
    let options = FormatOptions::default();
    assert_eq!(to_json(&true, &options).unwrap(), "true");
    assert_eq!(to_json(&-12i8, &options).unwrap(), "-12");
    assert_eq!(to_json(&u64::MAX, &options).unwrap(), "18446744073709551615");
    assert_eq!(to_json(&0.1f64, &options).unwrap(), "0.1");
    assert_eq!(to_json(&1e300f64, &options).unwrap(), "1e300");
    assert_eq!(to_json(&2.0f64, &options).unwrap(), "2");
    assert_eq!(to_json(&0.1f32, &options).unwrap(), "0.1");
    assert_eq!(
        to_json(&Decimal::from_str("1.50").unwrap(), &options).unwrap(),
        "1.50"
    );
    assert_eq!(to_json("tab\there", &options).unwrap(), r#""tab\there""#);
    assert_eq!(to_json(&None::<i32>, &options).unwrap(), "null");
}

#[test]
fn collections() {
    let options = FormatOptions::default();
    let list = vec![Some(1i32), None, Some(3)];
    assert_eq!(to_json(&list, &options).unwrap(), "[1,null,3]");

    let mut map = BTreeMap::new();
    map.insert("b".to_string(), vec!["x".to_string()]);
    map.insert("a".to_string(), vec![]);
    assert_eq!(to_json(&map, &options).unwrap(), r#"{"a":[],"b":["x"]}"#);
}

#[test]
fn non_finite_float_inside_collection_fails() {
    let err = to_json(&vec![1.0, f64::NAN], &FormatOptions::default()).unwrap_err();
    assert_eq!(err.message(), "Cannot write NaN as a JSON number");
}

#[test]
fn non_finite_float_value_is_written_as_null() {
    let value = Value::Array(vec![
        Value::from(f64::NAN),
        Value::from(f64::INFINITY),
        Value::from(-1.5),
    ]);
    let text = write_value(&value, &FormatOptions::default());
    assert_eq!(text, "[null,null,-1.5]");
    assert_eq!(parse_str(&text).unwrap(), value);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn pretty_print_layout() {
    let value = parse_str(r#"{"a":[1,{"b":null}],"c":"d"}"#).unwrap();
    let expected = "{\n  \"a\": [\n    1,\n    {\n      \"b\": null\n    }\n  ],\n  \"c\": \"d\"\n}";
    assert_eq!(write_value(&value, &FormatOptions::pretty()), expected);
}

#[test]
fn camel_case_rewrites_keys_at_every_depth() {
    let value = parse_str(r#"{"user_id":1,"Display Name":{"first_name":"ada"}}"#).unwrap();
    let options = FormatOptions::default().with_camel_case(true);
    assert_eq!(
        write_value(&value, &options),
        r#"{"userId":1,"displayName":{"firstName":"ada"}}"#
    );
}

#[test]
fn camel_case_leaves_values_alone() {
    let value = parse_str(r#"{"k":"snake_case_value"}"#).unwrap();
    let options = FormatOptions::default().with_camel_case(true);
    assert_eq!(write_value(&value, &options), r#"{"k":"snake_case_value"}"#);
}

#[test]
fn parsed_text_is_reproduced() {
    let text = r#"{"a":[1.50,"\u0001\"",true,null],"b":{},"a":-0}"#;
    let value: Value = parse_str(text).unwrap();
    assert_eq!(write_value(&value, &FormatOptions::default()), text);
}
