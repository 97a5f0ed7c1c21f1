//! # dynjson-core
//!
//! Parses JSON text into an immutable [`Value`] tree and exposes it through
//! [`DynamicValue`], a lightweight view that converts nodes to concrete types
//! only when asked: integers with exact overflow diagnostics, floats and
//! decimals, enums from a runtime schema, and date-times in several formats.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use dynjson_core::{deserialize_dynamic, FormatOptions};
//!
//! let json = r#"{"name": "launch", "at": "2009-W01-1T08:00Z", "count": "1234"}"#;
//! let doc = deserialize_dynamic(json, FormatOptions::default()).unwrap();
//! let root = doc.root();
//!
//! let at: DateTime<Utc> = root.member("at").unwrap().cast().unwrap();
//! assert_eq!(at.to_rfc3339(), "2008-12-29T08:00:00+00:00");
//!
//! // "1234" has too many digits for an i8
//! let err = root.member("count").unwrap().cast::<i8>().unwrap_err();
//! assert_eq!(err.to_string(), "Number did not end when expected, may overflow");
//! ```
//!
//! ## Modules
//!
//! - [`reader`]: character sources with position tracking
//! - [`parser`]: strict JSON text → [`Value`]
//! - [`value`]: the document tree
//! - [`numeric`]: number coercion and shortest round-trip formatting
//! - [`enums`]: enum coercion against an [`EnumSchema`]
//! - [`dynamic`]: the [`DynamicValue`] façade and cast targets
//! - [`ops`]: operator semantics over [`Scalar`] operands
//! - [`writer`]: JSON output and the [`ToJson`] trait
//! - [`stream`]: iteration over concatenated documents
//! - [`options`]: [`FormatOptions`]
//! - [`error`]: the [`Error`] type and fixed diagnostic strings

pub mod dynamic;
pub mod enums;
pub mod error;
pub mod numeric;
pub mod ops;
pub mod options;
pub mod parser;
pub mod reader;
pub mod stream;
pub mod value;
pub mod writer;

pub use dynamic::{DynamicValue, Elements, Entries, FromDynamic, JsonIndex};
pub use enums::{coerce_enum, format_enum, format_flags, EnumMember, EnumSchema, JsonEnum};
pub use error::{messages, Error, ErrorKind, Result};
pub use numeric::{coerce_number, format_f32, format_f64, parse_number, NumericTarget};
pub use ops::Scalar;
pub use options::FormatOptions;
pub use parser::{parse, parse_str, MAX_DEPTH};
pub use reader::{CharSource, IoSource, Position, Reader, StrSource};
pub use stream::{deserialize_stream, deserialize_stream_from, ValueStream};
pub use value::{Number, Value, ValueKind};
pub use writer::{to_json, write_value, ToJson};

use std::io::BufRead;

/// A parsed document together with the options it was read under.
///
/// [`DynamicValue`]s borrow from the tree, so the document must outlive them.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
    options: FormatOptions,
}

impl Document {
    pub fn new(root: Value, options: FormatOptions) -> Self {
        Self { root, options }
    }

    /// A dynamic view of the root node.
    pub fn root(&self) -> DynamicValue<'_> {
        DynamicValue::new(&self.root, self.options)
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn options(&self) -> FormatOptions {
        self.options
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

/// Parse `source` as a single JSON document.
pub fn deserialize_dynamic(source: &str, options: FormatOptions) -> Result<Document> {
    Ok(Document::new(parse_str(source)?, options))
}

/// Parse a single JSON document from a byte stream.
pub fn deserialize_dynamic_from<R: BufRead>(source: R, options: FormatOptions) -> Result<Document> {
    let value = parse(&mut Reader::from_read(source))?;
    Ok(Document::new(value, options))
}
