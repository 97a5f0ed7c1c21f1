use dynjson_core::{messages, parse, parse_str, ErrorKind, Reader, Value, MAX_DEPTH};

fn syntax_error(text: &str) -> dynjson_core::Error {
    let err = parse_str(text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax, "{text}");
    err
}

// ============================================================================
// Accepted documents
// ============================================================================

#[test]
fn parse_nested_document() {
    let value = parse_str(r#"{"a": [1, 2.5, "x", true, null], "b": {"c": {}}}"#).unwrap();
    let a = value.get("a").unwrap().as_array().unwrap();
    assert_eq!(a.len(), 5);
    assert_eq!(a[0].as_number().unwrap().as_i64(), Some(1));
    assert_eq!(a[1].as_number().unwrap().raw(), "2.5");
    assert_eq!(a[2], Value::from("x"));
    assert_eq!(a[3], Value::Bool(true));
    assert!(a[4].is_null());
    assert_eq!(
        value.get("b").unwrap().get("c").unwrap(),
        &Value::Object(vec![])
    );
}

#[test]
fn parse_preserves_member_order_and_duplicates() {
    let value = parse_str(r#"{"z":1,"a":2,"z":3}"#).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, ["z", "a", "z"]);
}

#[test]
fn parse_number_forms() {
    for literal in ["0", "-0", "42", "-17", "3.25", "1e10", "1E-3", "-2.5e+8"] {
        let value = parse_str(literal).unwrap();
        assert_eq!(value.as_number().unwrap().raw(), literal);
    }
}

#[test]
fn parse_number_beyond_f64_range_keeps_literal() {
    let value = parse_str("1e400").unwrap();
    let number = value.as_number().unwrap();
    assert_eq!(number.raw(), "1e400");
    assert!(number.as_f64().is_infinite());
}

#[test]
fn parse_simple_escapes() {
    let value = parse_str(r#""\"\\\/\b\f\n\r\t""#).unwrap();
    assert_eq!(value.as_str(), Some("\"\\/\u{8}\u{c}\n\r\t"));
}

#[test]
fn parse_unicode_escapes() {
    let value = parse_str(r#""\u00e9\u4F60""#).unwrap();
    assert_eq!(value.as_str(), Some("\u{e9}\u{4f60}"));
}

#[test]
fn parse_raw_non_ascii() {
    let value = parse_str("\"caf\u{e9} \u{1f600}\"").unwrap();
    assert_eq!(value.as_str(), Some("caf\u{e9} \u{1f600}"));
}

#[test]
fn parse_surrounding_whitespace() {
    let value = parse_str(" \t\r\n[ 1 , 2 ]\n ").unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn parse_from_byte_stream() {
    let bytes = "{\"k\": \"\u{e9}t\u{e9}\"}".as_bytes();
    let value = parse(&mut Reader::from_read(bytes)).unwrap();
    assert_eq!(value.get("k").unwrap().as_str(), Some("\u{e9}t\u{e9}"));
}

#[test]
fn parse_nesting_at_limit() {
    let text = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
    assert!(parse_str(&text).is_ok());
}

#[test]
fn parse_mixed_nesting_at_limit() {
    let half = MAX_DEPTH / 2;
    let text = "{\"k\":[".repeat(half) + "null" + &"]}".repeat(half);
    let mut value = &parse_str(&text).unwrap();
    for _ in 0..half {
        value = value.get("k").unwrap().get_index(0).unwrap();
    }
    assert!(value.is_null());

    let text = "{\"k\":[".repeat(half + 1) + "null" + &"]}".repeat(half + 1);
    assert_eq!(parse_str(&text).unwrap_err().message(), messages::TOO_DEEP);
}

// ============================================================================
// Rejected documents
// ============================================================================

#[test]
fn reject_empty_input() {
    assert_eq!(syntax_error("").message(), messages::UNEXPECTED_END);
    assert_eq!(syntax_error("   ").message(), messages::UNEXPECTED_END);
}

#[test]
fn reject_trailing_content() {
    let err = syntax_error("[1] x");
    assert_eq!(err.message(), messages::TRAILING_CONTENT);
    assert_eq!(err.snippet_after_error(), Some("x"));
}

#[test]
fn reject_trailing_comma() {
    assert_eq!(syntax_error("[1,]").message(), messages::EXPECTED_VALUE);
    assert_eq!(syntax_error(r#"{"a":1,}"#).message(), messages::EXPECTED_KEY);
}

#[test]
fn reject_missing_colon() {
    assert_eq!(syntax_error(r#"{"a" 1}"#).message(), messages::EXPECTED_COLON);
}

#[test]
fn reject_missing_separators() {
    assert_eq!(
        syntax_error(r#"{"a":1 "b":2}"#).message(),
        messages::EXPECTED_COMMA_OR_BRACE
    );
    assert_eq!(
        syntax_error("[1 2]").message(),
        messages::EXPECTED_COMMA_OR_BRACKET
    );
}

#[test]
fn reject_unterminated_containers() {
    assert_eq!(syntax_error("[1, 2").message(), messages::UNEXPECTED_END);
    assert_eq!(syntax_error(r#"{"a": 1"#).message(), messages::UNEXPECTED_END);
}

#[test]
fn reject_string_errors() {
    assert_eq!(syntax_error(r#""abc"#).message(), messages::UNTERMINATED_STRING);
    assert_eq!(syntax_error(r#""\q""#).message(), messages::INVALID_ESCAPE);
    assert_eq!(syntax_error(r#""\u12G4""#).message(), messages::EXPECTED_HEX);
    assert_eq!(
        syntax_error("\"a\u{1}b\"").message(),
        messages::CONTROL_CHARACTER
    );
    assert_eq!(syntax_error("'single'").message(), messages::EXPECTED_VALUE);
}

#[test]
fn reject_malformed_numbers() {
    assert_eq!(syntax_error("01").message(), messages::LEADING_ZERO);
    assert_eq!(syntax_error("-").message(), messages::EXPECTED_DIGIT);
    assert_eq!(syntax_error("1.").message(), messages::EXPECTED_DIGIT);
    assert_eq!(syntax_error("1e").message(), messages::EXPECTED_DIGIT);
    assert_eq!(syntax_error("+1").message(), messages::EXPECTED_VALUE);
    assert_eq!(syntax_error(".5").message(), messages::EXPECTED_VALUE);
}

#[test]
fn reject_bad_literals() {
    assert_eq!(syntax_error("tru").message(), messages::EXPECTED_LITERAL);
    assert_eq!(syntax_error("nul").message(), messages::EXPECTED_LITERAL);
    assert_eq!(syntax_error("True").message(), messages::EXPECTED_VALUE);
}

#[test]
fn reject_comments() {
    assert_eq!(
        syntax_error("[1, // two\n 2]").message(),
        messages::EXPECTED_VALUE
    );
}

#[test]
fn reject_nesting_past_limit() {
    let text = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
    assert_eq!(syntax_error(&text).message(), messages::TOO_DEEP);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn error_reports_line_and_column() {
    let err = syntax_error("{\n  \"a\": 1,\n  \"b\" 2\n}");
    let position = err.position().unwrap();
    assert_eq!(position.line, 3);
    assert_eq!(position.column, 7);
    assert_eq!(err.snippet_after_error(), Some("2\n}"));
}

#[test]
fn snippet_is_capped_at_fifty_characters() {
    let text = format!("[1 {}]", "x".repeat(100));
    let err = syntax_error(&text);
    assert_eq!(err.snippet_after_error().unwrap().chars().count(), 50);
}

#[test]
fn display_is_exactly_the_message() {
    let err = syntax_error("[1 2]");
    assert_eq!(err.to_string(), "Expected ',' or ']'");
    assert!(err.detailed().starts_with("Expected ',' or ']' at line 1, column 4"));
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let bytes: &[u8] = &[b'"', 0xC3, b'"'];
    let err = parse(&mut Reader::from_read(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.message(), messages::INVALID_UTF8);
}
