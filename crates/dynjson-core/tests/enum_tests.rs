use dynjson_core::{
    coerce_enum, deserialize_dynamic, format_enum, format_flags, parse_str, EnumMember,
    EnumSchema, ErrorKind, FormatOptions, JsonEnum, Value,
};
use std::sync::LazyLock;

fn abc_flags() -> EnumSchema {
    EnumSchema::flags(
        "Abc",
        vec![
            EnumMember::new("None", 0),
            EnumMember::new("A", 1),
            EnumMember::new("B", 2),
            EnumMember::new("C", 4),
        ],
    )
}

fn status() -> EnumSchema {
    EnumSchema::new(
        "Status",
        vec![
            EnumMember::new("Active", 1),
            EnumMember::new("Suspended", 2).renamed("on-hold"),
            EnumMember::new("Closed", 3),
        ],
    )
}

// ============================================================================
// Plain enums
// ============================================================================

#[test]
fn plain_enum_matches_case_insensitively() {
    let schema = status();
    assert_eq!(coerce_enum(&Value::from("active"), &schema).unwrap(), 1);
    assert_eq!(coerce_enum(&Value::from("CLOSED"), &schema).unwrap(), 3);
}

#[test]
fn rename_is_used_for_both_directions() {
    let schema = status();
    assert_eq!(coerce_enum(&Value::from("On-Hold"), &schema).unwrap(), 2);
    assert_eq!(format_enum(2, &schema).unwrap(), "on-hold");
    assert_eq!(format_enum(1, &schema).unwrap(), "Active");
}

#[test]
fn unknown_token_is_a_coercion_error() {
    let err = coerce_enum(&Value::from("Deleted"), &status()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Coercion);
    assert_eq!(
        err.message(),
        "Requested value 'Deleted' was not found in enum Status"
    );
}

#[test]
fn plain_enum_rejects_comma_lists() {
    assert!(coerce_enum(&Value::from("Active, Closed"), &status()).is_err());
}

#[test]
fn numeric_nodes_must_be_declared() {
    let schema = status();
    assert_eq!(coerce_enum(&parse_str("3").unwrap(), &schema).unwrap(), 3);
    assert!(coerce_enum(&parse_str("4").unwrap(), &schema).is_err());
    assert!(coerce_enum(&parse_str("1.5").unwrap(), &schema).is_err());
}

#[test]
fn other_kinds_do_not_coerce() {
    let err = coerce_enum(&Value::Bool(true), &status()).unwrap_err();
    assert_eq!(err.message(), "Cannot convert bool to enum Status");
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn flags_combine_in_any_order() {
    let schema = abc_flags();
    assert_eq!(coerce_enum(&Value::from("B, A, C"), &schema).unwrap(), 7);
    assert_eq!(coerce_enum(&Value::from("C,A"), &schema).unwrap(), 5);
    assert_eq!(coerce_enum(&Value::from("  b ,\ta  "), &schema).unwrap(), 3);
}

#[test]
fn flags_single_member() {
    assert_eq!(coerce_enum(&Value::from("B"), &abc_flags()).unwrap(), 2);
    assert_eq!(coerce_enum(&Value::from("None"), &abc_flags()).unwrap(), 0);
}

#[test]
fn flags_unknown_or_empty_element() {
    let schema = abc_flags();
    assert!(coerce_enum(&Value::from("A, D"), &schema).is_err());
    assert!(coerce_enum(&Value::from("A,,B"), &schema).is_err());
    assert!(coerce_enum(&Value::from(""), &schema).is_err());
}

#[test]
fn flags_format_in_declaration_order() {
    let schema = abc_flags();
    assert_eq!(format_flags(7, &schema).unwrap(), "A, B, C");
    assert_eq!(format_flags(5, &schema).unwrap(), "A, C");
    assert_eq!(format_flags(0, &schema).unwrap(), "None");
    assert!(format_flags(8, &schema).is_err());
}

#[test]
fn flags_numeric_node_must_be_a_union() {
    let schema = abc_flags();
    assert_eq!(coerce_enum(&parse_str("6").unwrap(), &schema).unwrap(), 6);
    assert!(coerce_enum(&parse_str("9").unwrap(), &schema).is_err());
}

#[test]
fn format_flags_requires_flags_schema() {
    assert!(format_flags(1, &status()).is_err());
}

#[test]
fn flags_list_composite_members_alongside_their_parts() {
    let schema = EnumSchema::flags(
        "Access",
        vec![
            EnumMember::new("Read", 1),
            EnumMember::new("Write", 2),
            EnumMember::new("ReadWrite", 3),
            EnumMember::new("Exec", 4),
        ],
    );
    assert_eq!(format_enum(1, &schema).unwrap(), "Read");
    assert_eq!(format_enum(3, &schema).unwrap(), "Read, Write, ReadWrite");
    assert_eq!(format_flags(7, &schema).unwrap(), "Read, Write, ReadWrite, Exec");
    assert_eq!(coerce_enum(&Value::from("read, write"), &schema).unwrap(), 3);
    assert_eq!(coerce_enum(&Value::from("ReadWrite"), &schema).unwrap(), 3);
}

// ============================================================================
// JsonEnum binding
// ============================================================================

#[derive(Debug, PartialEq)]
enum Weekday {
    Monday,
    Tuesday,
}

static WEEKDAY: LazyLock<EnumSchema> = LazyLock::new(|| {
    EnumSchema::new(
        "Weekday",
        vec![
            EnumMember::new("Monday", 1).renamed("mon"),
            EnumMember::new("Tuesday", 2).renamed("tue"),
        ],
    )
});

impl JsonEnum for Weekday {
    fn schema() -> &'static EnumSchema {
        &WEEKDAY
    }

    fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            _ => None,
        }
    }

    fn to_value(&self) -> i64 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
        }
    }
}

#[test]
fn cast_enum_through_dynamic_value() {
    let doc = deserialize_dynamic(r#"["tue", "Monday", 2, "fri"]"#, FormatOptions::default())
        .unwrap();
    let root = doc.root();
    assert_eq!(root.index(0).unwrap().cast_enum::<Weekday>().unwrap(), Weekday::Tuesday);
    assert_eq!(root.index(1).unwrap().cast_enum::<Weekday>().unwrap(), Weekday::Monday);
    assert_eq!(root.index(2).unwrap().cast_enum::<Weekday>().unwrap(), Weekday::Tuesday);
    assert!(root.index(3).unwrap().cast_enum::<Weekday>().is_err());
}

#[test]
fn json_enum_writes_its_rename() {
    assert_eq!(Weekday::Monday.json_name().unwrap(), "mon");
}

#[test]
fn cast_enum_value_without_rust_type() {
    let doc = deserialize_dynamic(r#""A, C""#, FormatOptions::default()).unwrap();
    assert_eq!(doc.root().cast_enum_value(&abc_flags()).unwrap(), 5);
}
