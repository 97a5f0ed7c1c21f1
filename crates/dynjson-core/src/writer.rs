//! JSON text output.
//!
//! [`write_value`] renders a [`Value`] tree, compact or pretty-printed, with
//! member names optionally rewritten to lowerCamelCase. [`ToJson`] lifts
//! ordinary Rust values (numbers, strings, dates, collections) into a tree
//! first, so every output path shares the same layout rules.

use crate::error::{Error, Result};
use crate::numeric::{format_f32, format_f64};
use crate::options::FormatOptions;
use crate::value::{Number, Value};
use chrono::{DateTime, Utc};
use dynjson_temporal::{format_datetime, FormattedDate, TemporalResult};
use heck::ToLowerCamelCase;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const INDENT: &str = "  ";

/// Render `value` as JSON text.
pub fn write_value(value: &Value, options: &FormatOptions) -> String {
    let mut out = String::new();
    Writer {
        out: &mut out,
        options,
    }
    .value(value, 0);
    out
}

struct Writer<'a> {
    out: &'a mut String,
    options: &'a FormatOptions,
}

impl Writer<'_> {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Number(n) => self.out.push_str(n.raw()),
            Value::String(s) => write_string(self.out, s),
            Value::Array(items) => self.array(items, depth),
            Value::Object(members) => self.object(members, depth),
        }
    }

    fn array(&mut self, items: &[Value], depth: usize) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            self.value(item, depth + 1);
        }
        self.newline(depth);
        self.out.push(']');
    }

    fn object(&mut self, members: &[(String, Value)], depth: usize) {
        if members.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        for (i, (key, value)) in members.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            if self.options.camel_case {
                write_string(self.out, &key.to_lower_camel_case());
            } else {
                write_string(self.out, key);
            }
            self.out.push(':');
            if self.options.pretty_print {
                self.out.push(' ');
            }
            self.value(value, depth + 1);
        }
        self.newline(depth);
        self.out.push('}');
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty_print {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push_str(INDENT);
            }
        }
    }
}

/// Append `text` as a quoted JSON string.
pub fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

// ---------------------------------------------------------------------------
// ToJson
// ---------------------------------------------------------------------------

/// Values that can be written as JSON under a set of [`FormatOptions`].
pub trait ToJson {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value>;
}

/// Serialize `value` as JSON text.
pub fn to_json<T: ToJson + ?Sized>(value: &T, options: &FormatOptions) -> Result<String> {
    Ok(write_value(&value.to_json_value(options)?, options))
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        (**self).to_json_value(options)
    }
}

impl ToJson for Value {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        Ok(self.clone())
    }
}

impl ToJson for bool {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! signed_to_json {
    ($($ty:ty),*) => {$(
        impl ToJson for $ty {
            fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
                Ok(Value::from(i64::from(*self)))
            }
        }
    )*};
}

signed_to_json!(i8, i16, i32, i64, u8, u16, u32);

impl ToJson for u64 {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        Ok(Value::Number(Number::from_literal(
            self.to_string(),
            *self as f64,
        )))
    }
}

fn non_finite(text: String) -> Error {
    Error::coercion(format!("Cannot write {} as a JSON number", text))
}

impl ToJson for f64 {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        if !self.is_finite() {
            return Err(non_finite(self.to_string()));
        }
        Ok(Value::Number(Number::from_literal(format_f64(*self), *self)))
    }
}

impl ToJson for f32 {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        if !self.is_finite() {
            return Err(non_finite(self.to_string()));
        }
        Ok(Value::Number(Number::from_literal(
            format_f32(*self),
            f64::from(*self),
        )))
    }
}

impl ToJson for Decimal {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        let double = self.to_f64().unwrap_or(f64::NAN);
        Ok(Value::Number(Number::from_literal(self.to_string(), double)))
    }
}

impl ToJson for str {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        Ok(Value::from(self))
    }
}

impl ToJson for String {
    fn to_json_value(&self, _: &FormatOptions) -> Result<Value> {
        Ok(Value::from(self.as_str()))
    }
}

/// Written in the configured date format: epoch formats as numbers, the
/// others as strings.
impl ToJson for DateTime<Utc> {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        Ok(match options.date_format.format(*self, options.iso_format) {
            FormattedDate::Text(text) => Value::String(text),
            FormattedDate::Integer(count) => Value::from(count),
        })
    }
}

/// Always ISO-8601, keeping whatever offset the value carries.
impl ToJson for TemporalResult {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        Ok(Value::String(format_datetime(self, options.iso_format)))
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        match self {
            Some(value) => value.to_json_value(options),
            None => Ok(Value::Null),
        }
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        self.iter()
            .map(|item| item.to_json_value(options))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        self.as_slice().to_json_value(options)
    }
}

impl<T: ToJson> ToJson for BTreeMap<String, T> {
    fn to_json_value(&self, options: &FormatOptions) -> Result<Value> {
        let members = self
            .iter()
            .map(|(key, value)| Ok((key.clone(), value.to_json_value(options)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Object(members))
    }
}
