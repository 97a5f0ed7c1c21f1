//! Format options shared by dynamic access and output.

use dynjson_temporal::{DateFormat, IsoFormat, UnspecifiedOffsetPolicy};
use serde::{Deserialize, Serialize};

/// How dates are read and written, and how output text is laid out.
///
/// Deserializes from a partial JSON object; absent fields take their defaults:
///
/// ```rust
/// use dynjson_core::FormatOptions;
/// use dynjson_temporal::DateFormat;
///
/// let options: FormatOptions =
///     serde_json::from_str(r#"{"date_format": "epoch_seconds"}"#).unwrap();
/// assert_eq!(options.date_format, DateFormat::EpochSeconds);
/// assert!(!options.pretty_print);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub date_format: DateFormat,
    /// Applied to ISO-8601 text that carries no offset
    pub unspecified_offset: UnspecifiedOffsetPolicy,
    pub iso_format: IsoFormat,
    /// Two-space indentation, one member or element per line
    pub pretty_print: bool,
    /// Rewrite member names to lowerCamelCase on output
    pub camel_case: bool,
}

impl FormatOptions {
    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    pub fn with_unspecified_offset(mut self, policy: UnspecifiedOffsetPolicy) -> Self {
        self.unspecified_offset = policy;
        self
    }

    pub fn with_iso_format(mut self, iso_format: IsoFormat) -> Self {
        self.iso_format = iso_format;
        self
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    pub fn with_camel_case(mut self, camel_case: bool) -> Self {
        self.camel_case = camel_case;
        self
    }
}
