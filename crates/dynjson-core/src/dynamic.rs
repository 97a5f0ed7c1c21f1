//! The dynamic value façade.
//!
//! A [`DynamicValue`] is a copyable view of one node in a parsed [`Value`]
//! tree, paired with the [`FormatOptions`] the document was read with. It owns
//! nothing: navigation returns further views into the same tree, and
//! conversion to concrete types happens only when [`DynamicValue::cast`] is
//! called.
//!
//! ```rust
//! use dynjson_core::{deserialize_dynamic, FormatOptions};
//!
//! let doc = deserialize_dynamic(r#"{"id": 7, "tags": ["a", "b"]}"#, FormatOptions::default())?;
//! let root = doc.root();
//! assert_eq!(root.member("id")?.cast::<u8>()?, 7);
//! assert_eq!(root.member("tags")?.len()?, 2);
//! assert_eq!(root.member("tags")?.index(1)?.cast::<String>()?, "b");
//! # Ok::<(), dynjson_core::Error>(())
//! ```

use crate::enums::{EnumSchema, JsonEnum};
use crate::error::{Error, Result};
use crate::numeric::coerce_number;
use crate::options::FormatOptions;
use crate::value::{Value, ValueKind};
use crate::writer::write_value;
use chrono::{DateTime, Utc};
use dynjson_temporal::{parse_datetime, TemporalResult};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::iter::FusedIterator;
use std::slice;

#[derive(Debug, Clone, Copy)]
pub struct DynamicValue<'a> {
    node: &'a Value,
    options: FormatOptions,
}

impl<'a> DynamicValue<'a> {
    pub fn new(node: &'a Value, options: FormatOptions) -> Self {
        Self { node, options }
    }

    fn wrap(&self, node: &'a Value) -> DynamicValue<'a> {
        DynamicValue::new(node, self.options)
    }

    fn mismatch(&self, target: &str) -> Error {
        Error::coercion(format!(
            "Cannot convert {} to {}",
            self.node.type_name(),
            target
        ))
    }

    /// The wrapped node.
    pub fn value(&self) -> &'a Value {
        self.node
    }

    pub fn options(&self) -> FormatOptions {
        self.options
    }

    pub fn kind(&self) -> ValueKind {
        self.node.kind()
    }

    pub fn is_null(&self) -> bool {
        self.node.is_null()
    }

    // -----------------------------------------------------------------------
    // Conversion
    // -----------------------------------------------------------------------

    /// Convert the node to `T`.
    pub fn cast<T: FromDynamic>(&self) -> Result<T> {
        T::from_dynamic(*self)
    }

    pub fn cast_enum<E: JsonEnum>(&self) -> Result<E> {
        E::from_json(self.node)
    }

    /// Member value for a schema that has no Rust type behind it.
    pub fn cast_enum_value(&self, schema: &EnumSchema) -> Result<i64> {
        schema.coerce(self.node)
    }

    /// Borrow string contents without copying.
    pub fn as_str(&self) -> Result<&'a str> {
        self.node.as_str().ok_or_else(|| self.mismatch("string"))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Array element by position or object member by exact name.
    pub fn index<K: JsonIndex>(&self, key: K) -> Result<DynamicValue<'a>> {
        key.index_into(self.node).map(|node| self.wrap(node))
    }

    /// First member named exactly `name`.
    pub fn member(&self, name: &str) -> Result<DynamicValue<'a>> {
        self.index(name)
    }

    pub fn try_member(&self, name: &str) -> Option<DynamicValue<'a>> {
        self.node.get(name).map(|node| self.wrap(node))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.node.get(name).is_some()
    }

    /// Number of elements in an array.
    pub fn len(&self) -> Result<usize> {
        self.node
            .as_array()
            .map(<[Value]>::len)
            .ok_or_else(|| self.mismatch("array"))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Object members in document order, duplicates included. Each call
    /// starts a fresh pass.
    pub fn entries(&self) -> Result<Entries<'a>> {
        let members = self.node.as_object().ok_or_else(|| self.mismatch("object"))?;
        Ok(Entries {
            members: members.iter(),
            options: self.options,
        })
    }

    pub fn elements(&self) -> Result<Elements<'a>> {
        let items = self.node.as_array().ok_or_else(|| self.mismatch("array"))?;
        Ok(Elements {
            items: items.iter(),
            options: self.options,
        })
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Serialize the node under `options` instead of the document's own.
    pub fn to_string_with(&self, options: &FormatOptions) -> String {
        write_value(self.node, options)
    }
}

/// Serializes the node with the options the document was read with.
impl fmt::Display for DynamicValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_value(self.node, &self.options))
    }
}

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

/// Keys accepted by [`DynamicValue::index`]: `usize` for arrays, strings for
/// objects.
pub trait JsonIndex {
    fn index_into<'v>(&self, value: &'v Value) -> Result<&'v Value>;
}

impl JsonIndex for usize {
    fn index_into<'v>(&self, value: &'v Value) -> Result<&'v Value> {
        let items = value.as_array().ok_or_else(|| {
            Error::coercion(format!("Cannot index {} by position", value.type_name()))
        })?;
        items.get(*self).ok_or_else(|| {
            Error::coercion(format!(
                "Index {} is out of range for an array of length {}",
                self,
                items.len()
            ))
        })
    }
}

macro_rules! signed_index {
    ($($ty:ty),*) => {$(
        impl JsonIndex for $ty {
            fn index_into<'v>(&self, value: &'v Value) -> Result<&'v Value> {
                match usize::try_from(*self) {
                    Ok(position) => position.index_into(value),
                    Err(_) => Err(Error::coercion(format!("Index {} is out of range", self))),
                }
            }
        }
    )*};
}

signed_index!(i32, i64);

impl JsonIndex for str {
    fn index_into<'v>(&self, value: &'v Value) -> Result<&'v Value> {
        if !value.is_object() {
            return Err(Error::coercion(format!(
                "Cannot look up member '{}' on {}",
                self,
                value.type_name()
            )));
        }
        value
            .get(self)
            .ok_or_else(|| Error::coercion(format!("No member named '{}'", self)))
    }
}

impl JsonIndex for String {
    fn index_into<'v>(&self, value: &'v Value) -> Result<&'v Value> {
        self.as_str().index_into(value)
    }
}

impl<T: JsonIndex + ?Sized> JsonIndex for &T {
    fn index_into<'v>(&self, value: &'v Value) -> Result<&'v Value> {
        (**self).index_into(value)
    }
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Entries<'a> {
    members: slice::Iter<'a, (String, Value)>,
    options: FormatOptions,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, DynamicValue<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.members
            .next()
            .map(|(key, node)| (key.as_str(), DynamicValue::new(node, self.options)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.members.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}
impl FusedIterator for Entries<'_> {}

#[derive(Debug, Clone)]
pub struct Elements<'a> {
    items: slice::Iter<'a, Value>,
    options: FormatOptions,
}

impl<'a> Iterator for Elements<'a> {
    type Item = DynamicValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items
            .next()
            .map(|node| DynamicValue::new(node, self.options))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl ExactSizeIterator for Elements<'_> {}
impl FusedIterator for Elements<'_> {}

// ---------------------------------------------------------------------------
// Cast targets
// ---------------------------------------------------------------------------

/// Types a [`DynamicValue`] can be cast to.
pub trait FromDynamic: Sized {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self>;
}

macro_rules! numeric_from_dynamic {
    ($($ty:ty),*) => {$(
        impl FromDynamic for $ty {
            fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
                coerce_number(value.node)
            }
        }
    )*};
}

numeric_from_dynamic!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, Decimal);

impl FromDynamic for bool {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        value.node.as_bool().ok_or_else(|| value.mismatch("bool"))
    }
}

impl FromDynamic for String {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromDynamic for () {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        if value.is_null() {
            Ok(())
        } else {
            Err(value.mismatch("null"))
        }
    }
}

impl<T: FromDynamic> FromDynamic for Option<T> {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_dynamic(value).map(Some)
        }
    }
}

impl FromDynamic for Value {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        Ok(value.node.clone())
    }
}

impl FromDynamic for serde_json::Value {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        Ok(serde_json::Value::from(value.node))
    }
}

/// Strings are read with the configured date format and offset policy;
/// numbers are epoch counts and need an epoch date format.
impl FromDynamic for DateTime<Utc> {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        let format = value.options.date_format;
        match value.node {
            Value::String(text) => Ok(format.parse_text(text, value.options.unspecified_offset)?),
            Value::Number(_) => {
                let count: i64 = coerce_number(value.node)?;
                Ok(format.parse_integer(count)?)
            }
            _ => Err(value.mismatch("date-time")),
        }
    }
}

/// The ISO-8601 fields as written, before any offset is applied.
impl FromDynamic for TemporalResult {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        let text = value.as_str()?;
        Ok(parse_datetime(text)?)
    }
}

impl<T: FromDynamic> FromDynamic for Vec<T> {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        value.elements()?.map(|element| element.cast()).collect()
    }
}

/// Every member must convert; for duplicate keys the first occurrence is kept.
impl<T: FromDynamic> FromDynamic for BTreeMap<String, T> {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (key, member) in value.entries()? {
            let converted = member.cast()?;
            map.entry(key.to_string()).or_insert(converted);
        }
        Ok(map)
    }
}

impl<T: FromDynamic> FromDynamic for HashMap<String, T> {
    fn from_dynamic(value: DynamicValue<'_>) -> Result<Self> {
        let mut map = HashMap::new();
        for (key, member) in value.entries()? {
            let converted = member.cast()?;
            map.entry(key.to_string()).or_insert(converted);
        }
        Ok(map)
    }
}
