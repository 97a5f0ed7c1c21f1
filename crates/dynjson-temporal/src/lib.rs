//! # dynjson-temporal
//!
//! Date/time text handling for dynjson: a strict ISO-8601 family grammar with
//! stable, exact diagnostics, plus the alternate date formats a JSON document
//! may use (Unix epoch counts, the legacy `/Date(ms)/` style, RFC 1123).
//!
//! ```rust
//! use dynjson_temporal::{parse_datetime, UnspecifiedOffsetPolicy};
//!
//! let parsed = parse_datetime("1989-01-31T12,5+01:23").unwrap();
//! assert_eq!((parsed.hour, parsed.minute), (12, 30));
//!
//! let utc = parsed.to_utc(UnspecifiedOffsetPolicy::AssumeUtc).unwrap();
//! assert_eq!(utc.to_rfc3339(), "1989-01-31T13:53:00+00:00");
//! ```
//!
//! ## Modules
//!
//! - [`iso8601`]: text → [`TemporalResult`]
//! - [`format`]: [`TemporalResult`] → text
//! - [`date_format`]: format selector and the non-ISO formats
//! - [`datetime`]: [`TemporalResult`] and offset resolution
//! - [`policy`]: handling of text with no offset
//! - [`error`]: error types and the fixed diagnostic strings

pub mod date_format;
pub mod datetime;
pub mod error;
pub mod format;
pub mod iso8601;
pub mod policy;

pub use date_format::{DateFormat, FormattedDate};
pub use datetime::{OffsetKind, Sign, TemporalResult};
pub use error::{messages, CalendarError, TemporalError};
pub use format::{format_datetime, IsoFormat, UtcDesignator};
pub use iso8601::{parse_datetime, IsoStyle, MAX_LENGTH};
pub use policy::UnspecifiedOffsetPolicy;
