//! Enumeration coercion against a runtime schema.
//!
//! An [`EnumSchema`] lists named members with integer values and an optional
//! JSON rename. Strings match member names (or renames) case-insensitively;
//! flags schemas also accept comma-separated lists and OR the values together.
//! Numeric nodes are accepted when they name a declared value, or for flags a
//! combination of declared bits.

use crate::error::{Error, Result};
use crate::numeric::coerce_number;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    /// Name used in JSON text instead of `name`
    pub rename: Option<String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            rename: None,
        }
    }

    pub fn renamed(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    /// The name written on output.
    pub fn json_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    fn matches(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token)
            || self
                .rename
                .as_deref()
                .is_some_and(|rename| rename.eq_ignore_ascii_case(token))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: String,
    pub flags: bool,
    pub members: Vec<EnumMember>,
}

impl EnumSchema {
    pub fn new(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            name: name.into(),
            flags: false,
            members,
        }
    }

    pub fn flags(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            flags: true,
            ..Self::new(name, members)
        }
    }

    /// Resolve a string token to its value.
    pub fn parse(&self, token: &str) -> Result<i64> {
        if !self.flags {
            return self.lookup(token.trim()).map(|member| member.value);
        }
        token.split(',').try_fold(0i64, |acc, element| {
            self.lookup(element.trim()).map(|member| acc | member.value)
        })
    }

    /// Accept a string token or a numeric node.
    pub fn coerce(&self, value: &Value) -> Result<i64> {
        match value {
            Value::String(token) => self.parse(token),
            Value::Number(_) => {
                let raw: i64 = coerce_number(value)?;
                self.format(raw)?;
                Ok(raw)
            }
            other => Err(Error::coercion(format!(
                "Cannot convert {} to enum {}",
                other.type_name(),
                self.name
            ))),
        }
    }

    /// The JSON name for `value`. Flags values list every declared nonzero
    /// member they contain, in declaration order, joined with `", "`.
    pub fn format(&self, value: i64) -> Result<String> {
        if !self.flags || value == 0 {
            return self
                .members
                .iter()
                .find(|m| m.value == value)
                .map(|m| m.json_name().to_string())
                .ok_or_else(|| self.undefined(value));
        }

        let mut covered = 0i64;
        let mut names = Vec::new();
        for member in &self.members {
            if member.value != 0 && member.value & value == member.value {
                covered |= member.value;
                names.push(member.json_name());
            }
        }
        if covered != value {
            return Err(self.undefined(value));
        }
        Ok(names.join(", "))
    }

    fn lookup(&self, token: &str) -> Result<&EnumMember> {
        let mut found = self.members.iter().filter(|m| m.matches(token));
        match (found.next(), found.next()) {
            (Some(member), None) => Ok(member),
            (Some(_), Some(_)) => Err(Error::coercion(format!(
                "Requested value '{}' matches more than one member of enum {}",
                token, self.name
            ))),
            (None, _) => Err(Error::coercion(format!(
                "Requested value '{}' was not found in enum {}",
                token, self.name
            ))),
        }
    }

    fn undefined(&self, value: i64) -> Error {
        Error::coercion(format!(
            "Value {} is not defined for enum {}",
            value, self.name
        ))
    }
}

/// Coerce a string or numeric node to a member value of `schema`.
pub fn coerce_enum(value: &Value, schema: &EnumSchema) -> Result<i64> {
    schema.coerce(value)
}

pub fn format_enum(value: i64, schema: &EnumSchema) -> Result<String> {
    schema.format(value)
}

/// [`format_enum`] restricted to flags schemas.
pub fn format_flags(value: i64, schema: &EnumSchema) -> Result<String> {
    if !schema.flags {
        return Err(Error::coercion(format!(
            "Enum {} is not a flags enum",
            schema.name
        )));
    }
    schema.format(value)
}

/// A Rust type backed by an [`EnumSchema`], for use with
/// [`DynamicValue::cast_enum`](crate::DynamicValue::cast_enum).
///
/// ```rust
/// use dynjson_core::{EnumMember, EnumSchema, JsonEnum};
/// use std::sync::LazyLock;
///
/// #[derive(Debug, PartialEq)]
/// enum Suit { Hearts = 1, Spades = 2 }
///
/// static SUIT: LazyLock<EnumSchema> = LazyLock::new(|| {
///     EnumSchema::new("Suit", vec![
///         EnumMember::new("Hearts", 1),
///         EnumMember::new("Spades", 2),
///     ])
/// });
///
/// impl JsonEnum for Suit {
///     fn schema() -> &'static EnumSchema { &SUIT }
///     fn from_value(value: i64) -> Option<Self> {
///         match value { 1 => Some(Suit::Hearts), 2 => Some(Suit::Spades), _ => None }
///     }
///     fn to_value(&self) -> i64 {
///         match self { Suit::Hearts => 1, Suit::Spades => 2 }
///     }
/// }
/// ```
pub trait JsonEnum: Sized {
    fn schema() -> &'static EnumSchema;
    fn from_value(value: i64) -> Option<Self>;
    fn to_value(&self) -> i64;

    fn from_json(value: &Value) -> Result<Self> {
        let raw = Self::schema().coerce(value)?;
        Self::from_value(raw).ok_or_else(|| Self::schema().undefined(raw))
    }

    fn json_name(&self) -> Result<String> {
        Self::schema().format(self.to_value())
    }
}
